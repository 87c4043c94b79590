//! Row-context expressions
//!
//! Accessor trees that project runtime state into system table rows. A tree
//! is owned by one row-emitting stream and rebound in place for every row.

pub mod reference;
pub mod shard;

pub use reference::{
    LiteralReference, ObjectFields, ReferenceImplementation, RowContextObjectExpression,
};
