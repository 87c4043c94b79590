//! CREATE TABLE

use std::collections::BTreeSet;

use strata_value::RowN;

use super::AnalysisContext;
use crate::error::{Error, Result};
use crate::metadata::{ColumnInfo, IndexType, SchemaKind, TableIdent};
use crate::parsing::ast::{ClusteredBy, Column, Expression, GenericProperties, IndexMethod, TableName};
use crate::semantic::parameters::Binder;
use crate::semantic::properties::TABLE_PROPERTIES;
use crate::semantic::settings::SETTING_NUMBER_OF_SHARDS;
use crate::semantic::shards::resolve_number_of_shards;
use crate::semantic::statement::{AnalyzedStatement, CreateTableAnalyzedStatement, StatementKind};

/// Characters a column name may not contain.
const INVALID_COLUMN_CHARACTERS: &[char] = &['.', '[', ']'];

#[derive(Debug)]
pub struct PreparedCreateTable<'s> {
    ident: TableIdent,
    if_not_exists: bool,
    exists: bool,
    columns: Vec<ColumnInfo>,
    primary_key: Vec<String>,
    clustered_by: Option<String>,
    partitioned_by: Vec<String>,
    number_of_shards: Option<&'s Expression>,
    properties: &'s GenericProperties,
}

/// Parsed parts of a CREATE TABLE statement.
pub struct CreateTable<'s> {
    pub name: &'s TableName,
    pub columns: &'s [Column],
    pub primary_key: &'s [String],
    pub clustered: Option<&'s ClusteredBy>,
    pub partitioned_by: &'s [String],
    pub properties: &'s GenericProperties,
    pub if_not_exists: bool,
}

impl<'s> CreateTable<'s> {
    pub fn prepare(self, ctx: &AnalysisContext<'_>) -> Result<PreparedCreateTable<'s>> {
        let resolver = ctx.resolver();
        let ident = resolver.resolve_ident(self.name)?;

        let schema = ctx.catalog.lookup_schema(ident.schema());
        if let Some(schema) = schema {
            match schema.kind() {
                SchemaKind::System => {
                    return Err(Error::UnsupportedOperation(format!(
                        "cannot create table in read-only schema '{}'",
                        schema.name()
                    )));
                }
                SchemaKind::Blob => {
                    return Err(Error::UnsupportedOperation(format!(
                        "cannot create a regular table in schema '{}', use CREATE BLOB TABLE",
                        schema.name()
                    )));
                }
                SchemaKind::Doc => {}
            }
        }
        // A schema that doesn't exist yet is created along with its first table
        let exists = schema.is_some_and(|s| s.lookup_table(ident.name()).is_some());
        if exists && !self.if_not_exists {
            return Err(Error::TableAlreadyExists(ident.fqn()));
        }

        let columns = self.columns()?;
        let primary_key = self.primary_key(&columns)?;
        let clustered_by = self.clustered_by(&columns, &primary_key)?;
        let partitioned_by = self.partitioned_by(&columns, &primary_key, clustered_by.as_deref())?;

        Ok(PreparedCreateTable {
            ident,
            if_not_exists: self.if_not_exists,
            exists,
            columns,
            primary_key,
            clustered_by,
            partitioned_by,
            number_of_shards: self.clustered.and_then(|c| c.number_of_shards.as_ref()),
            properties: self.properties,
        })
    }

    fn columns(&self) -> Result<Vec<ColumnInfo>> {
        if self.columns.is_empty() {
            return Err(Error::InvalidArgument(
                "CREATE TABLE needs at least one column".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in self.columns {
            let name = &column.name;
            if name.starts_with('_') {
                return Err(Error::InvalidColumnName(
                    name.clone(),
                    "names starting with '_' are reserved for system columns".into(),
                ));
            }
            if name.contains(INVALID_COLUMN_CHARACTERS) {
                return Err(Error::InvalidColumnName(
                    name.clone(),
                    "must not contain '.', '[' or ']'".into(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidColumnName(
                    name.clone(),
                    "column is defined more than once".into(),
                ));
            }
            columns.push(ColumnInfo {
                name: name.clone(),
                data_type: column.datatype.clone(),
                index_type: match column.index {
                    IndexMethod::Plain => IndexType::Plain,
                    IndexMethod::Fulltext => IndexType::Fulltext,
                    IndexMethod::Off => IndexType::Off,
                },
            });
        }
        Ok(columns)
    }

    /// Column-level and table-level PRIMARY KEY, in declaration order.
    fn primary_key(&self, columns: &[ColumnInfo]) -> Result<Vec<String>> {
        let inline = self
            .columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| &c.name);
        let mut primary_key: Vec<String> = Vec::new();
        for name in inline.chain(self.primary_key) {
            if primary_key.contains(name) {
                continue;
            }
            let column = find_column(columns, name)?;
            if !column.data_type.is_primitive() {
                return Err(Error::InvalidArgument(format!(
                    "Cannot use column '{}' of type {} as primary key",
                    name, column.data_type
                )));
            }
            primary_key.push(name.clone());
        }
        Ok(primary_key)
    }

    fn clustered_by(&self, columns: &[ColumnInfo], primary_key: &[String]) -> Result<Option<String>> {
        let Some(name) = self.clustered.and_then(|c| c.column.as_ref()) else {
            return Ok(None);
        };
        let column = find_column(columns, name)?;
        if !column.data_type.is_primitive() {
            return Err(Error::InvalidArgument(format!(
                "Cannot use column '{}' of type {} as clustered by column",
                name, column.data_type
            )));
        }
        if !primary_key.is_empty() && !primary_key.contains(name) {
            return Err(Error::InvalidArgument(format!(
                "Clustered by column '{}' must be part of primary key",
                name
            )));
        }
        Ok(Some(name.clone()))
    }

    fn partitioned_by(
        &self,
        columns: &[ColumnInfo],
        primary_key: &[String],
        clustered_by: Option<&str>,
    ) -> Result<Vec<String>> {
        let mut partitioned_by: Vec<String> = Vec::new();
        for name in self.partitioned_by {
            if partitioned_by.contains(name) {
                return Err(Error::InvalidArgument(format!(
                    "Column '{}' is listed more than once in PARTITIONED BY",
                    name
                )));
            }
            let column = find_column(columns, name)?;
            if !column.data_type.is_primitive() {
                return Err(Error::InvalidArgument(format!(
                    "Cannot use column '{}' of type {} in PARTITIONED BY clause",
                    name, column.data_type
                )));
            }
            if !primary_key.is_empty() && !primary_key.contains(name) {
                return Err(Error::InvalidArgument(format!(
                    "Cannot use non primary key column '{}' in PARTITIONED BY clause if primary key is set on table",
                    name
                )));
            }
            if clustered_by == Some(name.as_str()) {
                return Err(Error::InvalidArgument(format!(
                    "Cannot use CLUSTERED BY column '{}' in PARTITIONED BY clause",
                    name
                )));
            }
            partitioned_by.push(name.clone());
        }
        if !partitioned_by.is_empty() && partitioned_by.len() == columns.len() {
            return Err(Error::InvalidArgument(
                "Cannot use all columns for partitioning".into(),
            ));
        }
        Ok(partitioned_by)
    }
}

fn find_column<'c>(columns: &'c [ColumnInfo], name: &str) -> Result<&'c ColumnInfo> {
    columns
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| Error::ColumnUnknown(name.to_string()))
}

impl PreparedCreateTable<'_> {
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
            TABLE_PROPERTIES.validate(&properties, StatementKind::CreateTable, true)?;
        table_parameter
            .settings_mut()
            .put(SETTING_NUMBER_OF_SHARDS, shards);

        Ok(AnalyzedStatement::CreateTable(CreateTableAnalyzedStatement {
            ident: self.ident.clone(),
            if_not_exists: self.if_not_exists,
            columns: self.columns.clone(),
            primary_key: self.primary_key.clone(),
            clustered_by: self.clustered_by.clone(),
            partitioned_by: self.partitioned_by.clone(),
            table_parameter: (!self.exists).then_some(table_parameter),
        }))
    }
}
