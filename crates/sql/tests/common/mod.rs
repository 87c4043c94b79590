//! Common test utilities for analyzer integration tests
#![allow(dead_code)]

use std::sync::Arc;

use strata_sql::metadata::{
    CatalogSnapshot, Routing, SchemaInfo, SchemaKind, TableIdent, TableInfo,
};
use strata_sql::semantic::settings::TableParameter;
use strata_sql::types::DataType;
use strata_sql::{
    Analysis, AnalyzedStatement, Analyzer, BulkAnalysis, Error, ParameterContext, RowN,
    SessionContext, Value, parse_sql,
};

/// Partition values of `doc.parted`: two dates and a null.
pub const PARTED_PARTITIONS: [Option<&str>; 3] =
    [Some("1395874800000"), Some("1395961200000"), None];

/// Two nodes holding shards of `t1`.
pub fn shard_routing() -> Routing {
    Routing::default()
        .with_shards("nodeOne", "t1", [1, 2])
        .with_shards("nodeTow", "t1", [3, 4])
}

/// Catalog used by every analyzer test: a handful of doc tables, one blob
/// table, a read-only `sys` schema and three data nodes.
pub fn catalog() -> CatalogSnapshot {
    let users = TableInfo::builder(TableIdent::new("doc", "users"), shard_routing())
        .add("id", DataType::Long)
        .add("name", DataType::String)
        .add("details", DataType::Object)
        .add_primary_key("id")
        .clustered_by("id")
        .build();

    let parted = TableInfo::builder(TableIdent::new("doc", "parted"), shard_routing())
        .add("id", DataType::Integer)
        .add("name", DataType::String)
        .add_partitioned("date", DataType::Timestamp)
        .add_partitions(
            PARTED_PARTITIONS
                .iter()
                .map(|value| vec![Value::from(*value)]),
        )
        .build();

    let multi_parted = TableInfo::builder(TableIdent::new("doc", "multi_parted"), shard_routing())
        .add("id", DataType::Integer)
        .add_partitioned("date", DataType::Timestamp)
        .add_partitioned("obj.name", DataType::String)
        .add_partitions([vec![Value::from("1395874800000"), Value::from("0")]])
        .build();

    let nested_pk = TableInfo::builder(TableIdent::new("doc", "nested_pk"), shard_routing())
        .add("id", DataType::Long)
        .add("o", DataType::Object)
        .add("o.b", DataType::Byte)
        .add_primary_key("id")
        .add_primary_key("o.b")
        .clustered_by("o.b")
        .build();

    let myblobs = TableInfo::blob(
        TableIdent::new("blob", "myblobs"),
        5,
        "0",
        None,
        shard_routing(),
    );

    let sys = SchemaInfo::new("sys", SchemaKind::System).with_table(
        TableInfo::builder(TableIdent::new("sys", "shards"), Routing::default())
            .add("id", DataType::Integer)
            .build(),
    );

    CatalogSnapshot::new(3)
        .with_table(users)
        .with_table(parted)
        .with_table(multi_parted)
        .with_table(nested_pk)
        .with_schema(SchemaInfo::new("blob", SchemaKind::Blob).with_table(myblobs))
        .with_schema(sys)
}

/// An analyzer over [`catalog`] and the default session.
pub struct TestContext {
    pub analyzer: Analyzer,
    pub session: SessionContext,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            analyzer: Analyzer::new(Arc::new(catalog())),
            session: SessionContext::system(),
        }
    }

    /// Analyze with the given parameter context, returning the error on failure.
    pub fn try_analyze(&self, sql: &str, params: &ParameterContext) -> Result<Analysis, Error> {
        let statement = parse_sql(sql)?;
        self.analyzer.analyze(&statement, &self.session, params)
    }

    /// Analyze without parameters. Panics with the error message on failure.
    pub fn analyze(&self, sql: &str) -> AnalyzedStatement {
        self.analyze_with(sql, RowN::EMPTY)
    }

    /// Analyze with one argument row. Panics with the error message on failure.
    pub fn analyze_with(&self, sql: &str, row: RowN) -> AnalyzedStatement {
        match self.try_analyze(sql, &ParameterContext::single(row)) {
            Ok(Analysis::Single(statement)) => statement,
            Ok(Analysis::Bulk(_)) => panic!("expected a single statement for {}", sql),
            Err(err) => panic!("{}", err),
        }
    }

    /// Analyze with bulk rows. Panics with the error message on failure.
    pub fn analyze_bulk(&self, sql: &str, rows: Vec<RowN>) -> BulkAnalysis {
        let params = ParameterContext::bulk(rows).expect("bulk rows have one shape");
        match self.try_analyze(sql, &params) {
            Ok(Analysis::Bulk(bulk)) => bulk,
            Ok(Analysis::Single(_)) => panic!("expected a bulk result for {}", sql),
            Err(err) => panic!("{}", err),
        }
    }

    /// Analyze expecting a failure, and return it.
    pub fn analyze_err(&self, sql: &str) -> Error {
        self.analyze_err_with(sql, RowN::EMPTY)
    }

    pub fn analyze_err_with(&self, sql: &str, row: RowN) -> Error {
        match self.try_analyze(sql, &ParameterContext::single(row)) {
            Ok(analysis) => panic!("expected {} to fail, got {:?}", sql, analysis),
            Err(err) => err,
        }
    }
}

/// Setup a test context
pub fn setup_test() -> TestContext {
    TestContext::new()
}

/// The table parameter of a statement, which must carry one.
pub fn table_parameter(statement: &AnalyzedStatement) -> &TableParameter {
    statement
        .table_parameter()
        .unwrap_or_else(|| panic!("no table parameter on {:?}", statement.kind()))
}
