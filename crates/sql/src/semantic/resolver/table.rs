//! Table name resolution against the catalog

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::metadata::{BLOB_SCHEMA_NAME, Catalog, SchemaInfo, TableIdent, TableInfo};
use crate::parsing::ast::TableName;
use crate::semantic::statement::StatementKind;
use crate::session::SessionContext;

/// Resolves table names written in a statement into identifiers and
/// catalog metadata.
pub struct TableResolver<'a> {
    catalog: &'a dyn Catalog,
    session: &'a SessionContext,
}

impl<'a> TableResolver<'a> {
    pub fn new(catalog: &'a dyn Catalog, session: &'a SessionContext) -> Self {
        Self { catalog, session }
    }

    /// Identifier for a doc table name. Unqualified names land in the
    /// session's default schema. Legality is checked here, before any
    /// existence check.
    pub fn resolve_ident(&self, name: &TableName) -> Result<TableIdent> {
        let schema = name
            .schema
            .as_deref()
            .unwrap_or_else(|| self.session.default_schema());
        TableIdent::try_new(schema, &name.name)
    }

    /// Identifier for a blob table name, which always lives in the blob
    /// schema.
    pub fn resolve_blob_ident(&self, name: &TableName) -> Result<TableIdent> {
        if let Some(schema) = name.schema.as_deref() {
            if schema != BLOB_SCHEMA_NAME {
                return Err(Error::InvalidArgument(format!(
                    "The Schema \"{}\" isn't valid in a [CREATE | ALTER] BLOB TABLE clause",
                    schema
                )));
            }
        }
        TableIdent::try_new(BLOB_SCHEMA_NAME, &name.name)
    }

    /// Resolve the identifier the way the statement kind wants it.
    pub fn resolve_ident_for(&self, name: &TableName, statement: StatementKind) -> Result<TableIdent> {
        if statement.is_blob() {
            self.resolve_blob_ident(name)
        } else {
            self.resolve_ident(name)
        }
    }

    /// The schema an identifier lives in. An explicitly named schema that
    /// doesn't exist is `SchemaUnknown`; a missing implicit schema just
    /// means the table can't be found.
    pub fn schema(&self, ident: &TableIdent, explicit: bool) -> Result<&'a SchemaInfo> {
        self.catalog.lookup_schema(ident.schema()).ok_or_else(|| {
            if explicit {
                Error::SchemaUnknown(ident.schema().to_string())
            } else {
                Error::TableUnknown(ident.fqn())
            }
        })
    }

    /// Look a table up, reporting absence as `None`. Schema errors still
    /// fail.
    pub fn lookup_table(&self, ident: &TableIdent, explicit: bool) -> Result<Option<Arc<TableInfo>>> {
        Ok(self.schema(ident, explicit)?.lookup_table(ident.name()).cloned())
    }

    /// Look a table up, failing with `TableUnknown` if it isn't there.
    pub fn resolve_table(&self, ident: &TableIdent, explicit: bool) -> Result<Arc<TableInfo>> {
        self.lookup_table(ident, explicit)?
            .ok_or_else(|| Error::TableUnknown(ident.fqn()))
    }

    /// Check that a table found by a statement has the kind the statement
    /// expects and lives in a writable schema.
    pub fn check_table_kind(&self, table: &TableInfo, statement: StatementKind) -> Result<()> {
        if let Some(schema) = self.catalog.lookup_schema(table.ident().schema()) {
            if schema.is_read_only() {
                return Err(Error::UnsupportedOperation(format!(
                    "cannot {} in read-only schema '{}'",
                    statement,
                    schema.name()
                )));
            }
        }
        match (statement.is_blob(), table.is_blob()) {
            (true, false) => Err(Error::UnsupportedOperation(format!(
                "{} cannot be used on table '{}', which is not a blob table",
                statement,
                table.ident()
            ))),
            (false, true) => Err(Error::UnsupportedOperation(format!(
                "{} cannot be used on blob table '{}', use {} BLOB TABLE",
                statement,
                table.ident(),
                if statement.is_alter() { "ALTER" } else { "DROP" }
            ))),
            _ => Ok(()),
        }
    }
}
