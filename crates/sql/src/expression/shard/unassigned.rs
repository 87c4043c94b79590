//! Shards without a live copy on any node

use super::recovery::RecoveryState;
use crate::error::Result;
use crate::metadata::{DEFAULT_SCHEMA_NAME, PartitionName};

/// Allocation state of a shard copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardState {
    Unassigned,
    Initializing,
    Started,
    Relocating,
}

impl ShardState {
    pub fn name(&self) -> &'static str {
        match self {
            ShardState::Unassigned => "UNASSIGNED",
            ShardState::Initializing => "INITIALIZING",
            ShardState::Started => "STARTED",
            ShardState::Relocating => "RELOCATING",
        }
    }
}

/// A shard copy that isn't started on any node, with the table it belongs
/// to derived from its index name.
#[derive(Debug, Clone, PartialEq)]
pub struct UnassignedShard {
    id: u32,
    schema_name: String,
    table_name: String,
    partition_ident: String,
    primary: bool,
    state: ShardState,
    recovery: Option<RecoveryState>,
}

impl UnassignedShard {
    /// Fails when the index name claims to be a partition but doesn't
    /// decode as one.
    pub fn new(
        id: u32,
        index_name: &str,
        primary: bool,
        state: ShardState,
        recovery: Option<RecoveryState>,
    ) -> Result<Self> {
        let (schema_name, table_name, partition_ident) = if index_name.contains(".partitioned.") {
            let partition = PartitionName::decode(index_name)?;
            (
                partition.table().schema().to_string(),
                partition.table().name().to_string(),
                partition.ident(),
            )
        } else {
            let (schema, table) = index_name
                .split_once('.')
                .unwrap_or((DEFAULT_SCHEMA_NAME, index_name));
            (schema.to_string(), table.to_string(), String::new())
        };

        Ok(Self {
            id,
            schema_name,
            table_name,
            partition_ident,
            primary,
            state,
            recovery,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Empty for shards of unpartitioned tables.
    pub fn partition_ident(&self) -> &str {
        &self.partition_ident
    }

    pub fn primary(&self) -> bool {
        self.primary
    }

    pub fn state(&self) -> ShardState {
        self.state
    }

    pub fn recovery(&self) -> Option<&RecoveryState> {
        self.recovery.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::metadata::TableIdent;
    use strata_value::Value;

    #[test]
    fn test_table_from_index_name() {
        let shard = UnassignedShard::new(1, "users", true, ShardState::Unassigned, None).unwrap();
        assert_eq!((shard.schema_name(), shard.table_name()), ("doc", "users"));
        assert_eq!(shard.partition_ident(), "");

        let shard = UnassignedShard::new(2, "custom.t", false, ShardState::Unassigned, None).unwrap();
        assert_eq!((shard.schema_name(), shard.table_name()), ("custom", "t"));
    }

    #[test]
    fn test_partition_index_name_decoded() {
        let partition = PartitionName::new(
            TableIdent::new("doc", "parted"),
            vec![Value::from("1395874800000")],
        );
        let shard = UnassignedShard::new(
            0,
            &partition.as_index_name(),
            true,
            ShardState::Initializing,
            None,
        )
        .unwrap();
        assert_eq!(shard.table_name(), "parted");
        assert_eq!(shard.partition_ident(), partition.ident());

        assert!(matches!(
            UnassignedShard::new(0, ".partitioned.parted.zz", true, ShardState::Unassigned, None),
            Err(Error::InvalidPartitionName(_))
        ));
    }
}
