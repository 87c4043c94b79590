//! Table metadata as the catalog hands it out

use serde::{Deserialize, Serialize};

use super::ident::TableIdent;
use super::partition::PartitionName;
use super::routing::Routing;
use crate::types::DataType;

/// How a column is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexType {
    #[default]
    Plain,
    Fulltext,
    Off,
}

/// What happens when a document brings columns the table doesn't know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnPolicy {
    #[default]
    Dynamic,
    Strict,
}

impl ColumnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnPolicy::Dynamic => "dynamic",
            ColumnPolicy::Strict => "strict",
        }
    }

    /// Value written to the `dynamic` mapping key.
    pub fn mapping_value(&self) -> &'static str {
        match self {
            ColumnPolicy::Dynamic => "true",
            ColumnPolicy::Strict => "strict",
        }
    }
}

/// A column of a table. Nested object columns use dotted paths (`o.b`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: DataType,
    pub index_type: IndexType,
}

/// Doc tables store documents; blob tables store binary objects keyed by
/// digest and may live under a custom path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableKind {
    Doc,
    Blob { blobs_path: Option<String> },
}

/// Immutable table metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    ident: TableIdent,
    kind: TableKind,
    columns: Vec<ColumnInfo>,
    primary_key: Vec<String>,
    clustered_by: Option<String>,
    partitioned_by: Vec<String>,
    partitions: Vec<PartitionName>,
    routing: Routing,
    number_of_shards: u32,
    number_of_replicas: String,
    column_policy: ColumnPolicy,
}

impl TableInfo {
    pub fn builder(ident: TableIdent, routing: Routing) -> TableInfoBuilder {
        TableInfoBuilder::new(ident, routing)
    }

    /// A blob table with its fixed `digest`/`last_modified` columns.
    pub fn blob(
        ident: TableIdent,
        number_of_shards: u32,
        number_of_replicas: &str,
        blobs_path: Option<String>,
        routing: Routing,
    ) -> Self {
        TableInfoBuilder::new(ident, routing)
            .add("digest", DataType::String)
            .add("last_modified", DataType::Timestamp)
            .add_primary_key("digest")
            .clustered_by("digest")
            .number_of_shards(number_of_shards)
            .number_of_replicas(number_of_replicas)
            .kind(TableKind::Blob { blobs_path })
            .build()
    }

    pub fn ident(&self) -> &TableIdent {
        &self.ident
    }

    pub fn kind(&self) -> &TableKind {
        &self.kind
    }

    pub fn is_blob(&self) -> bool {
        matches!(self.kind, TableKind::Blob { .. })
    }

    pub fn blobs_path(&self) -> Option<&str> {
        match &self.kind {
            TableKind::Blob { blobs_path } => blobs_path.as_deref(),
            TableKind::Doc => None,
        }
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn clustered_by(&self) -> Option<&str> {
        self.clustered_by.as_deref()
    }

    pub fn partitioned_by(&self) -> &[String] {
        &self.partitioned_by
    }

    pub fn is_partitioned(&self) -> bool {
        !self.partitioned_by.is_empty()
    }

    pub fn partitions(&self) -> &[PartitionName] {
        &self.partitions
    }

    pub fn has_partition(&self, partition: &PartitionName) -> bool {
        self.partitions.contains(partition)
    }

    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    pub fn number_of_shards(&self) -> u32 {
        self.number_of_shards
    }

    pub fn number_of_replicas(&self) -> &str {
        &self.number_of_replicas
    }

    pub fn column_policy(&self) -> ColumnPolicy {
        self.column_policy
    }
}

/// Builder for [`TableInfo`], mostly for catalog snapshots and tests.
pub struct TableInfoBuilder {
    info: TableInfo,
}

impl TableInfoBuilder {
    fn new(ident: TableIdent, routing: Routing) -> Self {
        Self {
            info: TableInfo {
                ident,
                kind: TableKind::Doc,
                columns: Vec::new(),
                primary_key: Vec::new(),
                clustered_by: None,
                partitioned_by: Vec::new(),
                partitions: Vec::new(),
                routing,
                number_of_shards: 5,
                number_of_replicas: "0-1".to_string(),
                column_policy: ColumnPolicy::Dynamic,
            },
        }
    }

    pub fn add(self, name: &str, data_type: DataType) -> Self {
        self.add_indexed(name, data_type, IndexType::Plain)
    }

    pub fn add_indexed(mut self, name: &str, data_type: DataType, index_type: IndexType) -> Self {
        self.info.columns.push(ColumnInfo {
            name: name.to_string(),
            data_type,
            index_type,
        });
        self
    }

    /// Add a column that is also a partition column.
    pub fn add_partitioned(mut self, name: &str, data_type: DataType) -> Self {
        self = self.add(name, data_type);
        self.info.partitioned_by.push(name.to_string());
        self
    }

    pub fn add_primary_key(mut self, column: &str) -> Self {
        self.info.primary_key.push(column.to_string());
        self
    }

    pub fn clustered_by(mut self, column: &str) -> Self {
        self.info.clustered_by = Some(column.to_string());
        self
    }

    /// Register existing partitions, given as value tuples.
    pub fn add_partitions<I>(mut self, partitions: I) -> Self
    where
        I: IntoIterator<Item = Vec<strata_value::Value>>,
    {
        let ident = self.info.ident.clone();
        self.info.partitions.extend(
            partitions
                .into_iter()
                .map(|values| PartitionName::new(ident.clone(), values)),
        );
        self
    }

    pub fn number_of_shards(mut self, shards: u32) -> Self {
        self.info.number_of_shards = shards;
        self
    }

    pub fn number_of_replicas(mut self, replicas: &str) -> Self {
        self.info.number_of_replicas = replicas.to_string();
        self
    }

    pub fn column_policy(mut self, policy: ColumnPolicy) -> Self {
        self.info.column_policy = policy;
        self
    }

    pub fn kind(mut self, kind: TableKind) -> Self {
        self.info.kind = kind;
        self
    }

    pub fn build(self) -> TableInfo {
        self.info
    }
}
