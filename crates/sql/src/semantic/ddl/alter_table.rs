//! ALTER TABLE and ALTER BLOB TABLE

use std::sync::Arc;

use strata_value::RowN;

use super::AnalysisContext;
use crate::error::{Error, Result};
use crate::metadata::{PartitionName, TableInfo};
use crate::parsing::ast::{AlterOperation, Expression, GenericProperties, TableName};
use crate::types::DataType;
use crate::semantic::parameters::Binder;
use crate::semantic::properties::PropertySchema;
use crate::semantic::settings::TableParameter;
use crate::semantic::statement::{
    AlterBlobTableAnalyzedStatement, AlterTableAnalyzedStatement, AnalyzedStatement, StatementKind,
};

/// Property name that changes the shard count of future partitions.
const NUMBER_OF_SHARDS: &str = "number_of_shards";

#[derive(Debug)]
enum PreparedOperation<'s> {
    Set(&'s GenericProperties),
    /// RESET takes no values, so its settings are known up front.
    Reset(TableParameter),
}

/// A partition column and the expression the PARTITION clause gives it.
#[derive(Debug)]
struct PartitionAssignment<'s> {
    column: &'s str,
    data_type: DataType,
    value: &'s Expression,
}

#[derive(Debug)]
pub struct PreparedAlterTable<'s> {
    kind: StatementKind,
    table: Arc<TableInfo>,
    exclude_partitions: bool,
    /// In the table's partition column order.
    partition: Option<Vec<PartitionAssignment<'s>>>,
    operation: PreparedOperation<'s>,
}

impl<'s> PreparedAlterTable<'s> {
    pub fn prepare(
        ctx: &AnalysisContext<'_>,
        name: &TableName,
        blob: bool,
        only: bool,
        partition: Option<&'s [(String, Expression)]>,
        operation: &'s AlterOperation,
    ) -> Result<Self> {
        let kind = if blob {
            StatementKind::AlterBlobTable
        } else {
            StatementKind::AlterTable
        };
        let resolver = ctx.resolver();
        let ident = resolver.resolve_ident_for(name, kind)?;
        let table = resolver.resolve_table(&ident, name.schema.is_some())?;
        resolver.check_table_kind(&table, kind)?;

        let partition = match partition {
            Some(assignments) => {
                if only {
                    return Err(Error::InvalidArgument(
                        "ONLY cannot be combined with a PARTITION clause".into(),
                    ));
                }
                Some(partition_values(&table, assignments)?)
            }
            None => None,
        };

        let schema = PropertySchema::for_statement(kind);
        let operation = match operation {
            AlterOperation::Set(properties) => {
                if properties.contains_key(NUMBER_OF_SHARDS) && schema.get(NUMBER_OF_SHARDS).is_some() {
                    check_number_of_shards(&table, partition.is_some())?;
                }
                PreparedOperation::Set(properties)
            }
            AlterOperation::Reset(names) => PreparedOperation::Reset(schema.reset(names, kind)?),
        };

        Ok(Self {
            kind,
            table,
            exclude_partitions: only,
            partition,
            operation,
        })
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn bind(&self, row: &RowN) -> Result<AnalyzedStatement> {
        let binder = Binder::new(row);

        let table_parameter = match &self.operation {
            PreparedOperation::Set(properties) => {
                let properties = binder.bind_properties(properties)?;
                PropertySchema::for_statement(self.kind).validate(&properties, self.kind, false)?
            }
            PreparedOperation::Reset(parameter) => parameter.clone(),
        };

        if self.kind == StatementKind::AlterBlobTable {
            return Ok(AnalyzedStatement::AlterBlobTable(
                AlterBlobTableAnalyzedStatement {
                    table: Arc::clone(&self.table),
                    table_parameter,
                },
            ));
        }

        let partition = match &self.partition {
            Some(assignments) => {
                let values = assignments
                    .iter()
                    .map(|a| {
                        PartitionName::normalize_value(a.column, &a.data_type, &binder.bind(a.value)?)
                    })
                    .collect::<Result<Vec<_>>>()?;
                let partition = PartitionName::new(self.table.ident().clone(), values);
                if !self.table.has_partition(&partition) {
                    return Err(Error::PartitionUnknown {
                        table: self.table.ident().fqn(),
                        partition: partition.ident(),
                    });
                }
                Some(partition)
            }
            None => None,
        };

        Ok(AnalyzedStatement::AlterTable(AlterTableAnalyzedStatement {
            table: Arc::clone(&self.table),
            partition,
            exclude_partitions: self.exclude_partitions,
            table_parameter,
        }))
    }
}

/// Order a PARTITION clause by the table's partition columns. The clause must
/// name each partition column exactly once and nothing else.
fn partition_values<'s>(
    table: &TableInfo,
    assignments: &'s [(String, Expression)],
) -> Result<Vec<PartitionAssignment<'s>>> {
    if !table.is_partitioned() {
        return Err(Error::InvalidArgument(format!(
            "table '{}' is not partitioned",
            table.ident()
        )));
    }
    for (i, (column, _)) in assignments.iter().enumerate() {
        if !table.partitioned_by().contains(column) {
            return Err(Error::InvalidArgument(format!(
                "\"{}\" is not a partition column of table '{}'",
                column,
                table.ident()
            )));
        }
        if assignments[..i].iter().any(|(seen, _)| seen == column) {
            return Err(Error::InvalidArgument(format!(
                "partition column \"{}\" is given more than once",
                column
            )));
        }
    }
    table
        .partitioned_by()
        .iter()
        .map(|column| {
            let (column, value) = assignments
                .iter()
                .find(|(name, _)| name == column)
                .ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "PARTITION clause must name every partition column of table '{}', missing \"{}\"",
                        table.ident(),
                        column
                    ))
                })?;
            let data_type = table
                .column(column)
                .map(|info| info.data_type.clone())
                .ok_or_else(|| Error::ColumnUnknown(column.clone()))?;
            Ok(PartitionAssignment {
                column,
                data_type,
                value,
            })
        })
        .collect()
}

fn check_number_of_shards(table: &TableInfo, single_partition: bool) -> Result<()> {
    if !table.is_partitioned() {
        return Err(Error::InvalidArgument(
            "Changing the number of shards is only allowed for partitioned tables".into(),
        ));
    }
    if single_partition {
        return Err(Error::InvalidArgument(
            "Changing the number of shards of a single partition is not supported".into(),
        ));
    }
    Ok(())
}
