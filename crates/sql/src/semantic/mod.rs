//! Semantic analysis of DDL statements
//!
//! This module binds parsed statements against catalog metadata and the
//! caller's parameters. It sits between parsing and the external planner:
//! the planner only ever sees fully validated, immutable statements.
//!
//! The analyzer:
//! - Resolves table names and checks their legality and existence
//! - Validates and converts WITH/SET properties against static schemas
//! - Binds placeholders against one argument row or a bulk batch
//! - Checks partition clauses against the table's partitions

pub mod analyzer;
pub mod ddl;
pub mod parameters;
pub mod properties;
pub mod resolver;
pub mod settings;
pub mod shards;
pub mod statement;

pub use analyzer::{Analysis, Analyzer, BulkAnalysis, BulkGroup};
pub use parameters::{Binder, ParameterContext};
pub use properties::{BLOB_TABLE_PROPERTIES, PropertySchema, TABLE_PROPERTIES};
pub use settings::{Settings, TableParameter};
pub use statement::{
    AlterBlobTableAnalyzedStatement, AlterTableAnalyzedStatement, AnalyzedStatement,
    CreateBlobTableAnalyzedStatement, CreateTableAnalyzedStatement,
    DropBlobTableAnalyzedStatement, DropTableAnalyzedStatement, StatementKind,
};
