//! Tests for the `sys.shards` recovery expressions

use std::collections::BTreeMap;

use strata_sql::expression::ReferenceImplementation;
use strata_sql::expression::shard::{
    RecoveryIndex, RecoveryStage, RecoveryState, RecoveryType, ShardRecoveryExpression, ShardState,
    UnassignedShard, UnassignedShardRowContext,
};
use strata_sql::{PartitionName, Row, TableIdent, Value};

fn recovery(recovered_files: u64, recovered_bytes: u64) -> RecoveryState {
    RecoveryState {
        stage: RecoveryStage::Translog,
        recovery_type: RecoveryType::Replica,
        total_time: 1_234,
        index: RecoveryIndex {
            total_files: 10,
            reused_files: 2,
            recovered_files,
            total_bytes: 2_048,
            reused_bytes: 1_024,
            recovered_bytes,
        },
    }
}

fn shard(id: u32, state: Option<RecoveryState>) -> UnassignedShard {
    UnassignedShard::new(id, "users", true, ShardState::Initializing, state).unwrap()
}

fn counters(used: i64, reused: i64, recovered: i64, percent: f32) -> Value {
    let mut map = BTreeMap::new();
    map.insert("used".to_string(), Value::I64(used));
    map.insert("reused".to_string(), Value::I64(reused));
    map.insert("recovered".to_string(), Value::I64(recovered));
    map.insert("percent".to_string(), Value::F32(percent));
    Value::Map(map)
}

#[test]
fn test_recovery_value_shape() {
    let mut expr = ShardRecoveryExpression::new();
    expr.set_next_row(&shard(1, Some(recovery(4, 512))));

    let mut expected = BTreeMap::new();
    expected.insert("total_time".to_string(), Value::I64(1_234));
    expected.insert("stage".to_string(), Value::from("TRANSLOG"));
    expected.insert("type".to_string(), Value::from("REPLICA"));
    expected.insert("size".to_string(), counters(2_048, 1_024, 512, 50.0));
    expected.insert("files".to_string(), counters(10, 2, 4, 50.0));
    assert_eq!(expr.value(), Some(Value::Map(expected)));
    assert_eq!(expr.lookup("files.percent"), Some(Value::F32(50.0)));
}

#[test]
fn test_rebind_never_shows_previous_shard() {
    let mut expr = ShardRecoveryExpression::new();
    expr.set_next_row(&shard(1, Some(recovery(8, 1_024))));
    assert_eq!(expr.lookup("size.percent"), Some(Value::F32(100.0)));

    expr.set_next_row(&shard(2, None));
    assert_eq!(expr.value(), None);
    assert!(expr.child("size").is_none());

    expr.set_next_row(&shard(3, Some(recovery(0, 256))));
    assert_eq!(expr.lookup("size.recovered"), Some(Value::I64(256)));
    assert_eq!(expr.lookup("size.percent"), Some(Value::F32(25.0)));
}

#[test]
fn test_row_context_renders_partition_rows() {
    let partition = PartitionName::new(
        TableIdent::new("custom", "parted"),
        vec![Value::from("1395874800000"), Value::Null],
    );
    let mut ctx = UnassignedShardRowContext::new();
    ctx.set_next_row(
        UnassignedShard::new(
            7,
            &partition.as_index_name(),
            false,
            ShardState::Unassigned,
            None,
        )
        .unwrap(),
    );

    let row = ctx
        .row(&["schema_name", "table_name", "partition_ident", "state", "primary", "recovery"])
        .unwrap();
    assert_eq!(
        row.values(),
        &[
            Value::from("custom"),
            Value::from("parted"),
            Value::from(partition.ident()),
            Value::from("UNASSIGNED"),
            Value::Bool(false),
            Value::Null,
        ]
    );
    assert_eq!(ctx.lookup("id"), Some(Value::I64(7)));
}
