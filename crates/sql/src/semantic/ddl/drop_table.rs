//! DROP TABLE and DROP BLOB TABLE

use std::sync::Arc;

use super::AnalysisContext;
use crate::error::{Error, Result};
use crate::metadata::{TableIdent, TableInfo};
use crate::parsing::ast::TableName;
use crate::semantic::statement::{
    AnalyzedStatement, DropBlobTableAnalyzedStatement, DropTableAnalyzedStatement, StatementKind,
};

/// Drops take no parameters, so the prepared form is already the result.
#[derive(Debug)]
pub struct PreparedDropTable {
    blob: bool,
    ident: TableIdent,
    if_exists: bool,
    table: Option<Arc<TableInfo>>,
}

impl PreparedDropTable {
    pub fn prepare(
        ctx: &AnalysisContext<'_>,
        name: &TableName,
        blob: bool,
        if_exists: bool,
    ) -> Result<Self> {
        let kind = if blob {
            StatementKind::DropBlobTable
        } else {
            StatementKind::DropTable
        };
        let resolver = ctx.resolver();
        let ident = resolver.resolve_ident_for(name, kind)?;

        let table = match resolver.resolve_table(&ident, name.schema.is_some()) {
            Ok(table) => Some(table),
            Err(Error::TableUnknown(_) | Error::SchemaUnknown(_)) if if_exists => None,
            Err(err) => return Err(err),
        };
        if let Some(table) = &table {
            resolver.check_table_kind(table, kind)?;
        }
        Ok(Self {
            blob,
            ident,
            if_exists,
            table,
        })
    }

    pub fn kind(&self) -> StatementKind {
        if self.blob {
            StatementKind::DropBlobTable
        } else {
            StatementKind::DropTable
        }
    }

    pub fn bind(&self) -> AnalyzedStatement {
        if self.blob {
            AnalyzedStatement::DropBlobTable(DropBlobTableAnalyzedStatement {
                ident: self.ident.clone(),
                drop_if_exists: self.if_exists,
                table: self.table.clone(),
            })
        } else {
            AnalyzedStatement::DropTable(DropTableAnalyzedStatement {
                ident: self.ident.clone(),
                drop_if_exists: self.if_exists,
                table: self.table.clone(),
            })
        }
    }
}
