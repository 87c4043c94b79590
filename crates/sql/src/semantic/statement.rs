//! Analyzed statements
//!
//! The output of analysis: one variant per statement kind, each carrying
//! exactly the fields the planner needs for that kind. Values are built once
//! by the analyzer and not updated afterwards.

use std::fmt;
use std::sync::Arc;

use crate::metadata::{ColumnInfo, PartitionName, TableIdent, TableInfo};
use crate::semantic::settings::TableParameter;

/// Statement kinds the analyzer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    CreateTable,
    CreateBlobTable,
    DropTable,
    DropBlobTable,
    AlterTable,
    AlterBlobTable,
}

impl StatementKind {
    pub fn is_create(&self) -> bool {
        matches!(self, StatementKind::CreateTable | StatementKind::CreateBlobTable)
    }

    pub fn is_alter(&self) -> bool {
        matches!(self, StatementKind::AlterTable | StatementKind::AlterBlobTable)
    }

    pub fn is_blob(&self) -> bool {
        matches!(
            self,
            StatementKind::CreateBlobTable | StatementKind::DropBlobTable | StatementKind::AlterBlobTable
        )
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::CreateTable => "CREATE TABLE",
            StatementKind::CreateBlobTable => "CREATE BLOB TABLE",
            StatementKind::DropTable => "DROP TABLE",
            StatementKind::DropBlobTable => "DROP BLOB TABLE",
            StatementKind::AlterTable => "ALTER TABLE",
            StatementKind::AlterBlobTable => "ALTER BLOB TABLE",
        })
    }
}

/// CREATE TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableAnalyzedStatement {
    pub ident: TableIdent,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnInfo>,
    pub primary_key: Vec<String>,
    pub clustered_by: Option<String>,
    pub partitioned_by: Vec<String>,
    /// None when the table exists and IF NOT EXISTS turned the statement
    /// into a no-op.
    pub table_parameter: Option<TableParameter>,
}

/// CREATE BLOB TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBlobTableAnalyzedStatement {
    pub ident: TableIdent,
    pub if_not_exists: bool,
    /// None on a no-op, as for CREATE TABLE.
    pub table_parameter: Option<TableParameter>,
}

/// DROP TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableAnalyzedStatement {
    pub ident: TableIdent,
    pub drop_if_exists: bool,
    /// None when the table doesn't exist and IF EXISTS allowed that.
    pub table: Option<Arc<TableInfo>>,
}

/// DROP BLOB TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct DropBlobTableAnalyzedStatement {
    pub ident: TableIdent,
    pub drop_if_exists: bool,
    pub table: Option<Arc<TableInfo>>,
}

/// ALTER TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableAnalyzedStatement {
    pub table: Arc<TableInfo>,
    /// Set when a PARTITION clause restricts the change to one partition.
    pub partition: Option<PartitionName>,
    /// ONLY: change the table template, leave existing partitions alone.
    pub exclude_partitions: bool,
    pub table_parameter: TableParameter,
}

/// ALTER BLOB TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct AlterBlobTableAnalyzedStatement {
    pub table: Arc<TableInfo>,
    pub table_parameter: TableParameter,
}

/// The validated, catalog-bound result of analyzing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzedStatement {
    CreateTable(CreateTableAnalyzedStatement),
    CreateBlobTable(CreateBlobTableAnalyzedStatement),
    DropTable(DropTableAnalyzedStatement),
    DropBlobTable(DropBlobTableAnalyzedStatement),
    AlterTable(AlterTableAnalyzedStatement),
    AlterBlobTable(AlterBlobTableAnalyzedStatement),
}

impl AnalyzedStatement {
    pub fn kind(&self) -> StatementKind {
        match self {
            AnalyzedStatement::CreateTable(_) => StatementKind::CreateTable,
            AnalyzedStatement::CreateBlobTable(_) => StatementKind::CreateBlobTable,
            AnalyzedStatement::DropTable(_) => StatementKind::DropTable,
            AnalyzedStatement::DropBlobTable(_) => StatementKind::DropBlobTable,
            AnalyzedStatement::AlterTable(_) => StatementKind::AlterTable,
            AnalyzedStatement::AlterBlobTable(_) => StatementKind::AlterBlobTable,
        }
    }

    /// The identifier of the table the statement targets.
    pub fn table_ident(&self) -> &TableIdent {
        match self {
            AnalyzedStatement::CreateTable(s) => &s.ident,
            AnalyzedStatement::CreateBlobTable(s) => &s.ident,
            AnalyzedStatement::DropTable(s) => &s.ident,
            AnalyzedStatement::DropBlobTable(s) => &s.ident,
            AnalyzedStatement::AlterTable(s) => s.table.ident(),
            AnalyzedStatement::AlterBlobTable(s) => s.table.ident(),
        }
    }

    /// Settings the statement wants applied, if any.
    pub fn table_parameter(&self) -> Option<&TableParameter> {
        match self {
            AnalyzedStatement::CreateTable(s) => s.table_parameter.as_ref(),
            AnalyzedStatement::CreateBlobTable(s) => s.table_parameter.as_ref(),
            AnalyzedStatement::DropTable(_) | AnalyzedStatement::DropBlobTable(_) => None,
            AnalyzedStatement::AlterTable(s) => Some(&s.table_parameter),
            AnalyzedStatement::AlterBlobTable(s) => Some(&s.table_parameter),
        }
    }

    /// The parts of the statement that depend on parameter values. Statements
    /// bound from one prepared statement are equal exactly when these are.
    pub(crate) fn bound_key(&self) -> (Option<&TableParameter>, Option<String>) {
        let partition = match self {
            AnalyzedStatement::AlterTable(s) => s.partition.as_ref().map(PartitionName::ident),
            _ => None,
        };
        (self.table_parameter(), partition)
    }

    /// True when executing the statement must not change anything: a create
    /// of an existing table with IF NOT EXISTS, or a drop of a missing table
    /// with IF EXISTS.
    pub fn is_no_op(&self) -> bool {
        match self {
            AnalyzedStatement::CreateTable(s) => s.table_parameter.is_none(),
            AnalyzedStatement::CreateBlobTable(s) => s.table_parameter.is_none(),
            AnalyzedStatement::DropTable(s) => s.table.is_none(),
            AnalyzedStatement::DropBlobTable(s) => s.table.is_none(),
            AnalyzedStatement::AlterTable(_) | AnalyzedStatement::AlterBlobTable(_) => false,
        }
    }
}
