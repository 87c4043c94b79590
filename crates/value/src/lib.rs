//! Strata Value - value type shared by the analyzer and its collaborators
//!
//! This crate provides:
//! - the [`Value`] enum used for literals, parameters and settings
//! - the [`Row`] abstraction: fixed-length positional tuples
//! - a tagged binary encoding used for partition identifiers

pub mod codec;
pub mod row;
pub mod types;

pub use codec::{Error, Result, decode_value, encode_value};
pub use row::{Row, RowN, Rows};
pub use types::Value;
