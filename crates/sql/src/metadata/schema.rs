//! Schemas and the catalog snapshot the analyzer reads from

use std::collections::BTreeMap;
use std::sync::Arc;

use super::ident::{BLOB_SCHEMA_NAME, DEFAULT_SCHEMA_NAME};
use super::table::TableInfo;

/// What kind of relations a schema holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// User document tables.
    Doc,
    /// Blob tables.
    Blob,
    /// Read-only virtual tables (`sys`, `information_schema`).
    System,
}

/// A schema and its tables.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInfo {
    name: String,
    kind: SchemaKind,
    tables: BTreeMap<String, Arc<TableInfo>>,
}

impl SchemaInfo {
    pub fn new(name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            kind,
            tables: BTreeMap::new(),
        }
    }

    pub fn with_table(mut self, table: TableInfo) -> Self {
        self.tables
            .insert(table.ident().name().to_string(), Arc::new(table));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn is_read_only(&self) -> bool {
        self.kind == SchemaKind::System
    }

    pub fn lookup_table(&self, name: &str) -> Option<&Arc<TableInfo>> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// Read-only view of cluster metadata. Implementations must be safe to read
/// from many analyses at once.
pub trait Catalog: Send + Sync {
    fn lookup_schema(&self, name: &str) -> Option<&SchemaInfo>;

    /// Number of data nodes, used to derive default shard counts.
    fn data_node_count(&self) -> usize;
}

/// An immutable in-memory catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    schemas: BTreeMap<String, SchemaInfo>,
    data_nodes: usize,
}

impl CatalogSnapshot {
    /// A snapshot with empty `doc` and `blob` schemas.
    pub fn new(data_nodes: usize) -> Self {
        Self::default()
            .with_schema(SchemaInfo::new(DEFAULT_SCHEMA_NAME, SchemaKind::Doc))
            .with_schema(SchemaInfo::new(BLOB_SCHEMA_NAME, SchemaKind::Blob))
            .with_data_nodes(data_nodes)
    }

    /// Add or replace a schema.
    pub fn with_schema(mut self, schema: SchemaInfo) -> Self {
        self.schemas.insert(schema.name().to_string(), schema);
        self
    }

    /// Add a table to its schema, creating a doc schema if needed.
    pub fn with_table(mut self, table: TableInfo) -> Self {
        let schema_name = table.ident().schema().to_string();
        let schema = self
            .schemas
            .remove(&schema_name)
            .unwrap_or_else(|| SchemaInfo::new(schema_name.clone(), SchemaKind::Doc));
        self.schemas.insert(schema_name, schema.with_table(table));
        self
    }

    pub fn with_data_nodes(mut self, data_nodes: usize) -> Self {
        self.data_nodes = data_nodes;
        self
    }
}

impl Catalog for CatalogSnapshot {
    fn lookup_schema(&self, name: &str) -> Option<&SchemaInfo> {
        self.schemas.get(name)
    }

    fn data_node_count(&self) -> usize {
        self.data_nodes
    }
}
