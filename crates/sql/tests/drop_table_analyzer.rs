//! Tests for DROP TABLE analysis

mod common;

use common::setup_test;
use strata_sql::{AnalyzedStatement, Error, ErrorKind};

#[test]
fn test_drop_existing_table() {
    let analysis = setup_test().analyze("drop table users");
    let AnalyzedStatement::DropTable(drop) = &analysis else {
        panic!("expected DROP TABLE, got {:?}", analysis);
    };
    assert_eq!(drop.ident.fqn(), "doc.users");
    assert!(!drop.drop_if_exists);
    let table = drop.table.as_ref().unwrap();
    assert_eq!(table.primary_key(), ["id".to_string()]);
    assert!(table.routing().has_locations());
    assert!(!analysis.is_no_op());
}

#[test]
#[should_panic(expected = "Table 'doc.unknown' unknown")]
fn test_drop_unknown_table() {
    setup_test().analyze("drop table unknown");
}

#[test]
fn test_drop_unknown_table_if_exists() {
    let analysis = setup_test().analyze("drop table if exists unknown");
    let AnalyzedStatement::DropTable(drop) = &analysis else {
        panic!("expected DROP TABLE, got {:?}", analysis);
    };
    assert!(drop.drop_if_exists);
    assert!(drop.table.is_none());
    assert!(analysis.is_no_op());
}

#[test]
fn test_drop_in_unknown_schema() {
    let ctx = setup_test();
    let err = ctx.analyze_err("drop table nope.t");
    assert_eq!(err, Error::SchemaUnknown("nope".into()));
    assert_eq!(err.kind(), ErrorKind::Existence);

    assert!(ctx.analyze("drop table if exists nope.t").is_no_op());
}

#[test]
fn test_drop_invalid_name() {
    let err = setup_test().analyze_err("drop table if exists \"a/b\"");
    assert_eq!(err, Error::InvalidTableName("a/b".into()));
}

#[test]
fn test_drop_system_table_rejected() {
    let err = setup_test().analyze_err("drop table sys.shards");
    assert!(matches!(err, Error::UnsupportedOperation(_)), "{:?}", err);
}

#[test]
fn test_drop_blob_table_through_drop_table_rejected() {
    let err = setup_test().analyze_err("drop table blob.myblobs");
    assert!(err.to_string().contains("DROP BLOB TABLE"), "{}", err);
}
