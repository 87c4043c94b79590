//! Statement analysis for a distributed SQL engine
//!
//! This crate turns parsed DDL statements into validated, catalog-bound
//! statements ready for planning:
//! - Resolves table identifiers against an immutable catalog snapshot
//! - Validates WITH/SET properties and converts them to storage settings
//! - Binds positional parameters, one row or a bulk batch at a time
//! - Encodes and decodes partition index names
//!
//! It also carries the row-context expressions that render shard recovery
//! state into `sys.shards` rows.

pub mod config;
pub mod error;
pub mod expression;
pub mod metadata;
pub mod parsing;
pub mod semantic;
pub mod session;
pub mod types;

pub use config::AnalyzerConfig;
pub use error::{Error, ErrorKind, Result};
pub use metadata::{Catalog, CatalogSnapshot, PartitionName, TableIdent, TableInfo};
pub use parsing::{Statement, parse_sql};
pub use semantic::{
    Analysis, AnalyzedStatement, Analyzer, BulkAnalysis, ParameterContext, StatementKind,
    TableParameter,
};
pub use session::SessionContext;
pub use strata_value::{Row, RowN, Rows, Value, row};
