//! Row rendering for unassigned shards in `sys.shards`

use std::collections::BTreeMap;

use strata_value::{RowN, Value};

use super::recovery::ShardRecoveryExpression;
use super::unassigned::UnassignedShard;
use crate::error::{Error, Result};
use crate::expression::reference::{LiteralReference, ReferenceImplementation};

/// Top-level columns, in table order.
pub const COLUMNS: &[&str] = &[
    "id",
    "schema_name",
    "table_name",
    "partition_ident",
    "state",
    "primary",
    "recovery",
];

const RECOVERY: &str = "recovery";

/// Column accessors for unassigned shard rows. Built once, then rebound to
/// each shard with [`UnassignedShardRowContext::set_next_row`].
#[derive(Default)]
pub struct UnassignedShardRowContext {
    shard: Option<UnassignedShard>,
    recovery: ShardRecoveryExpression,
}

impl UnassignedShardRowContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_next_row(&mut self, shard: UnassignedShard) {
        self.recovery.set_next_row(&shard);
        self.shard = Some(shard);
    }

    /// Whether a dotted column path exists, whatever row is bound.
    pub fn has_column(&self, path: &str) -> bool {
        match path.split_once('.') {
            Some((RECOVERY, rest)) => self.recovery.has_path(rest),
            Some(_) => false,
            None => COLUMNS.contains(&path),
        }
    }

    fn scalar(shard: &UnassignedShard, name: &str) -> Option<Value> {
        Some(match name {
            "id" => Value::I64(i64::from(shard.id())),
            "schema_name" => Value::from(shard.schema_name()),
            "table_name" => Value::from(shard.table_name()),
            "partition_ident" => Value::from(shard.partition_ident()),
            "state" => Value::from(shard.state().name()),
            "primary" => Value::Bool(shard.primary()),
            _ => return None,
        })
    }

    /// Render the bound shard as a row of the given columns. Unknown
    /// columns fail; columns that don't apply to the shard are null.
    pub fn row(&self, columns: &[&str]) -> Result<RowN> {
        let shard = self
            .shard
            .as_ref()
            .ok_or_else(|| Error::InvalidArgument("no shard bound to row context".into()))?;
        let mut cells = Vec::with_capacity(columns.len());
        for column in columns {
            if !self.has_column(column) {
                return Err(Error::ColumnUnknown(column.to_string()));
            }
            let value = match Self::scalar(shard, column) {
                Some(value) => Some(value),
                None => self.lookup(column),
            };
            cells.push(value.unwrap_or(Value::Null));
        }
        Ok(RowN::new(cells))
    }
}

impl ReferenceImplementation for UnassignedShardRowContext {
    fn value(&self) -> Option<Value> {
        let shard = self.shard.as_ref()?;
        let mut row = BTreeMap::new();
        for column in COLUMNS {
            let value = match Self::scalar(shard, column) {
                Some(value) => value,
                None => self.recovery.value().unwrap_or(Value::Null),
            };
            row.insert(column.to_string(), value);
        }
        Some(Value::Map(row))
    }

    fn child(&self, name: &str) -> Option<Box<dyn ReferenceImplementation + '_>> {
        if name == RECOVERY {
            return Some(Box::new(&self.recovery));
        }
        let value = Self::scalar(self.shard.as_ref()?, name)?;
        Some(Box::new(LiteralReference(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::shard::recovery::{RecoveryIndex, RecoveryStage, RecoveryState, RecoveryType};
    use crate::expression::shard::unassigned::ShardState;
    use strata_value::Row;

    fn recovering(id: u32, recovered_bytes: u64) -> UnassignedShard {
        UnassignedShard::new(
            id,
            "users",
            true,
            ShardState::Initializing,
            Some(RecoveryState {
                stage: RecoveryStage::Index,
                recovery_type: RecoveryType::Gateway,
                total_time: 1_000,
                index: RecoveryIndex {
                    total_bytes: 100,
                    recovered_bytes,
                    ..RecoveryIndex::default()
                },
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_row_tracks_rebinds() {
        let mut ctx = UnassignedShardRowContext::new();
        let columns = ["id", "recovery.size.percent", "recovery.stage"];

        ctx.set_next_row(recovering(1, 25));
        let row = ctx.row(&columns).unwrap();
        assert_eq!(row.get(0), Some(&Value::I64(1)));
        assert_eq!(row.get(1), Some(&Value::F32(25.0)));
        assert_eq!(row.get(2), Some(&Value::from("INDEX")));

        ctx.set_next_row(recovering(2, 50));
        assert_eq!(ctx.row(&columns).unwrap().get(1), Some(&Value::F32(50.0)));

        ctx.set_next_row(UnassignedShard::new(3, "users", false, ShardState::Unassigned, None).unwrap());
        let row = ctx.row(&columns).unwrap();
        assert_eq!(row.values(), &[Value::I64(3), Value::Null, Value::Null]);
        assert_eq!(ctx.lookup("recovery"), None);
    }

    #[test]
    fn test_unknown_columns_fail() {
        let mut ctx = UnassignedShardRowContext::new();
        assert!(ctx.row(&["id"]).is_err());
        ctx.set_next_row(recovering(1, 0));
        assert_eq!(
            ctx.row(&["recovery.size.nope"]),
            Err(Error::ColumnUnknown("recovery.size.nope".into()))
        );
        assert_eq!(ctx.row(&["node"]), Err(Error::ColumnUnknown("node".into())));
    }
}
