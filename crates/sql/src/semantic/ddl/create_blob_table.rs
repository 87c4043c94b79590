//! CREATE BLOB TABLE

use strata_value::RowN;

use super::AnalysisContext;
use crate::error::{Error, Result};
use crate::metadata::TableIdent;
use crate::parsing::ast::{Expression, GenericProperties, TableName};
use crate::semantic::parameters::Binder;
use crate::semantic::properties::BLOB_TABLE_PROPERTIES;
use crate::semantic::settings::SETTING_NUMBER_OF_SHARDS;
use crate::semantic::shards::resolve_number_of_shards;
use crate::semantic::statement::{AnalyzedStatement, CreateBlobTableAnalyzedStatement, StatementKind};

#[derive(Debug)]
pub struct PreparedCreateBlobTable<'s> {
    ident: TableIdent,
    if_not_exists: bool,
    exists: bool,
    number_of_shards: Option<&'s Expression>,
    properties: &'s GenericProperties,
}

impl<'s> PreparedCreateBlobTable<'s> {
    pub fn prepare(
        ctx: &AnalysisContext<'_>,
        name: &TableName,
        number_of_shards: Option<&'s Expression>,
        properties: &'s GenericProperties,
        if_not_exists: bool,
    ) -> Result<Self> {
        let resolver = ctx.resolver();
        let ident = resolver.resolve_blob_ident(name)?;
        // The blob schema is created along with its first table, as for CREATE TABLE
        let exists = ctx
            .catalog
            .lookup_schema(ident.schema())
            .is_some_and(|schema| schema.lookup_table(ident.name()).is_some());
        if exists && !if_not_exists {
            return Err(Error::TableAlreadyExists(ident.fqn()));
        }
        Ok(Self {
            ident,
            if_not_exists,
            exists,
            number_of_shards,
            properties,
        })
    }

    pub fn bind(&self, ctx: &AnalysisContext<'_>, row: &RowN) -> Result<AnalyzedStatement> {
        let binder = Binder::new(row);
        let shards = self
            .number_of_shards
            .map(|expr| binder.bind(expr))
            .transpose()?;
        let shards = resolve_number_of_shards(
            shards.as_ref(),
            ctx.config,
            ctx.catalog.data_node_count(),
        )?;

        let properties = binder.bind_properties(self.properties)?;
        let mut table_parameter =
            BLOB_TABLE_PROPERTIES.validate(&properties, StatementKind::CreateBlobTable, true)?;
        table_parameter
            .settings_mut()
            .put(SETTING_NUMBER_OF_SHARDS, shards);

        Ok(AnalyzedStatement::CreateBlobTable(
            CreateBlobTableAnalyzedStatement {
                ident: self.ident.clone(),
                if_not_exists: self.if_not_exists,
                table_parameter: (!self.exists).then_some(table_parameter),
            },
        ))
    }
}
