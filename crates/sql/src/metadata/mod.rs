//! Catalog metadata: identifiers, tables, schemas, partitions and routing.
//!
//! Everything here is an immutable snapshot. The analyzer reads it and never
//! mutates it; changes go back through the cluster-coordination service.

pub mod ident;
pub mod partition;
pub mod routing;
pub mod schema;
pub mod table;

pub use ident::{BLOB_SCHEMA_NAME, DEFAULT_SCHEMA_NAME, TableIdent};
pub use partition::PartitionName;
pub use routing::Routing;
pub use schema::{Catalog, CatalogSnapshot, SchemaInfo, SchemaKind};
pub use table::{ColumnInfo, ColumnPolicy, IndexType, TableInfo, TableInfoBuilder, TableKind};
