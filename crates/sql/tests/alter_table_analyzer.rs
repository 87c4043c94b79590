//! Tests for ALTER TABLE analysis

mod common;

use chrono::NaiveDate;
use common::{setup_test, table_parameter};
use strata_sql::semantic::settings::{
    SETTING_AUTO_EXPAND_REPLICAS, SETTING_BLOCKS_READ_ONLY, SETTING_NUMBER_OF_REPLICAS,
    SETTING_NUMBER_OF_SHARDS, SETTING_REFRESH_INTERVAL,
};
use strata_sql::{AnalyzedStatement, Error, ErrorKind, PartitionName, TableIdent, Value, row};

fn alter(analysis: &AnalyzedStatement) -> &strata_sql::semantic::AlterTableAnalyzedStatement {
    match analysis {
        AnalyzedStatement::AlterTable(alter) => alter,
        other => panic!("expected ALTER TABLE, got {:?}", other),
    }
}

#[test]
fn test_alter_only_writes_supplied_settings() {
    let analysis = setup_test().analyze("alter table users set (number_of_replicas = '0-all')");
    let alter = alter(&analysis);
    assert_eq!(alter.table.ident().fqn(), "doc.users");
    assert!(alter.partition.is_none());
    assert!(!alter.exclude_partitions);

    let settings = alter.table_parameter.settings();
    assert_eq!(settings.len(), 2);
    assert_eq!(settings.get(SETTING_AUTO_EXPAND_REPLICAS), Some("0-all"));
    assert_eq!(settings.get_as_i32(SETTING_NUMBER_OF_REPLICAS), Some(0));
}

#[test]
fn test_alter_reset_writes_defaults() {
    let analysis = setup_test().analyze("alter table users reset (refresh_interval, blocks.read_only)");
    let settings = table_parameter(&analysis).settings();
    assert_eq!(settings.get(SETTING_REFRESH_INTERVAL), Some("1000ms"));
    assert_eq!(settings.get_as_bool(SETTING_BLOCKS_READ_ONLY), Some(false));
}

#[test]
#[should_panic(expected = "Invalid property \"foobar\" passed to ALTER TABLE statement")]
fn test_alter_invalid_property() {
    setup_test().analyze("alter table users set (foobar = 1)");
}

#[test]
#[should_panic(expected = "Table 'doc.unknown' unknown")]
fn test_alter_unknown_table() {
    setup_test().analyze("alter table unknown set (number_of_replicas = 1)");
}

#[test]
fn test_alter_partition() {
    let analysis = setup_test().analyze(
        "alter table parted partition (date = 1395874800000) set (number_of_replicas = 1)",
    );
    let alter = alter(&analysis);
    let expected = PartitionName::new(
        TableIdent::new("doc", "parted"),
        vec![Value::from("1395874800000")],
    );
    assert_eq!(alter.partition.as_ref(), Some(&expected));
    assert_eq!(
        PartitionName::decode(&expected.as_index_name()).unwrap(),
        expected
    );
}

#[test]
fn test_alter_null_partition() {
    let analysis = setup_test()
        .analyze("alter table parted partition (date = null) set (refresh_interval = 2000)");
    let partition = alter(&analysis).partition.clone().unwrap();
    assert_eq!(partition.values(), &[Value::Null]);
}

#[test]
fn test_alter_partition_with_parameter() {
    let analysis = setup_test().analyze_with(
        "alter table parted partition (date = ?) set (number_of_replicas = ?)",
        row!["1395961200000", 2],
    );
    let alter = alter(&analysis);
    assert_eq!(
        alter.partition.as_ref().unwrap().values(),
        &[Value::from("1395961200000")]
    );
    assert_eq!(
        alter.table_parameter.settings().get_as_i32(SETTING_NUMBER_OF_REPLICAS),
        Some(2)
    );
}

#[test]
fn test_alter_partition_with_timestamp_parameter() {
    let ts = NaiveDate::from_ymd_opt(2014, 3, 26)
        .and_then(|date| date.and_hms_opt(23, 0, 0))
        .unwrap();
    let ctx = setup_test();
    for value in [Value::Timestamp(ts), Value::from("2014-03-26T23:00:00")] {
        let analysis = ctx.analyze_with(
            "alter table parted partition (date = ?) set (number_of_replicas = 1)",
            row![value],
        );
        assert_eq!(
            alter(&analysis).partition.as_ref().unwrap().values(),
            &[Value::from("1395874800000")]
        );
    }
}

#[test]
fn test_alter_partition_value_of_wrong_type() {
    let ctx = setup_test();
    let err = ctx.analyze_err("alter table parted partition (date = 'foo') set (number_of_replicas = 1)");
    assert!(
        matches!(&err, Error::InvalidPropertyValue { property, .. } if property == "date"),
        "{:?}",
        err
    );
    assert_eq!(err.kind(), ErrorKind::Property);

    let err = ctx.analyze_err_with(
        "alter table parted partition (date = ?) set (number_of_replicas = 1)",
        row![true],
    );
    assert!(matches!(err, Error::InvalidPropertyValue { .. }), "{:?}", err);
}

#[test]
fn test_alter_multi_column_partition_in_any_order() {
    let analysis = setup_test().analyze(
        "alter table multi_parted partition (obj['name'] = 0, date = 1395874800000) \
         set (number_of_replicas = 1)",
    );
    assert_eq!(
        alter(&analysis).partition.as_ref().unwrap().values(),
        &[Value::from("1395874800000"), Value::from("0")]
    );
}

#[test]
fn test_alter_unknown_partition() {
    let err = setup_test()
        .analyze_err("alter table parted partition (date = 1) set (number_of_replicas = 1)");
    assert!(matches!(err, Error::PartitionUnknown { .. }), "{:?}", err);
    assert_eq!(err.kind(), ErrorKind::Existence);
}

#[test]
fn test_alter_partition_clause_checks() {
    let ctx = setup_test();
    let cases = [
        "alter table users partition (id = 1) set (number_of_replicas = 1)",
        "alter table parted partition (name = 'x') set (number_of_replicas = 1)",
        "alter table multi_parted partition (date = 1395874800000) set (number_of_replicas = 1)",
        "alter table parted partition (date = 1, date = 2) set (number_of_replicas = 1)",
        "alter table only parted partition (date = 1395874800000) set (number_of_replicas = 1)",
    ];
    for sql in cases {
        let err = ctx.analyze_err(sql);
        assert!(matches!(err, Error::InvalidArgument(_)), "{}: {:?}", sql, err);
    }
}

#[test]
fn test_alter_only_excludes_partitions() {
    let analysis = setup_test().analyze("alter table only parted set (number_of_replicas = 1)");
    assert!(alter(&analysis).exclude_partitions);
}

#[test]
fn test_alter_number_of_shards() {
    let ctx = setup_test();
    let analysis = ctx.analyze("alter table parted set (number_of_shards = 4)");
    assert_eq!(
        table_parameter(&analysis).settings().get_as_i32(SETTING_NUMBER_OF_SHARDS),
        Some(4)
    );

    let err = ctx.analyze_err("alter table users set (number_of_shards = 4)");
    assert!(err.to_string().contains("only allowed for partitioned tables"));

    let err = ctx.analyze_err(
        "alter table parted partition (date = null) set (number_of_shards = 4)",
    );
    assert!(err.to_string().contains("single partition"));

    let err = ctx.analyze_err("alter table parted set (number_of_shards = 0)");
    assert!(matches!(err, Error::InvalidPropertyValue { .. }));
}

#[test]
fn test_alter_system_table_rejected() {
    let err = setup_test().analyze_err("alter table sys.shards set (number_of_replicas = 1)");
    assert!(matches!(err, Error::UnsupportedOperation(_)));
}
