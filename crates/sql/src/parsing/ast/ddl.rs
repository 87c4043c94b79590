//! Data Definition Language (DDL) statements: CREATE, DROP, ALTER

use std::collections::BTreeMap;
use std::fmt;

use super::expressions::Expression;
use crate::types::data_type::DataType;

/// A possibly schema-qualified table name, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    pub schema: Option<String>,
    pub name: String,
}

impl TableName {
    pub fn new(schema: Option<&str>, name: &str) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// How a column is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMethod {
    #[default]
    Plain,
    Fulltext,
    Off,
}

/// CREATE TABLE column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
    pub primary_key: bool,
    pub index: IndexMethod,
}

/// `WITH (...)` / `SET (...)` properties. Keys are unique and sorted.
pub type GenericProperties = BTreeMap<String, Expression>;

/// `CLUSTERED [BY (column)] [INTO n SHARDS]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusteredBy {
    pub column: Option<String>,
    pub number_of_shards: Option<Expression>,
}

/// What an ALTER statement changes.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterOperation {
    Set(GenericProperties),
    Reset(Vec<String>),
}

/// DDL statements
#[derive(Debug, Clone, PartialEq)]
pub enum DdlStatement {
    /// CREATE TABLE: creates a new table.
    CreateTable {
        name: TableName,
        columns: Vec<Column>,
        /// Table-level PRIMARY KEY (...) columns.
        primary_key: Vec<String>,
        clustered: Option<ClusteredBy>,
        partitioned_by: Vec<String>,
        properties: GenericProperties,
        /// IF NOT EXISTS: if true, don't error if the table already exists.
        if_not_exists: bool,
    },
    /// CREATE BLOB TABLE: creates a blob table in the blob schema.
    CreateBlobTable {
        name: TableName,
        number_of_shards: Option<Expression>,
        properties: GenericProperties,
        if_not_exists: bool,
    },
    /// DROP TABLE / DROP BLOB TABLE.
    DropTable {
        name: TableName,
        blob: bool,
        /// IF EXISTS: if true, don't error if the table doesn't exist.
        if_exists: bool,
    },
    /// ALTER TABLE / ALTER BLOB TABLE.
    AlterTable {
        name: TableName,
        blob: bool,
        /// ONLY: apply to the table template but not to existing partitions.
        only: bool,
        /// PARTITION (column = value, ...)
        partition: Option<Vec<(String, Expression)>>,
        operation: AlterOperation,
    },
}
