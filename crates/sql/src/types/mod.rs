//! Data types of catalog columns.

pub mod data_type;

pub use data_type::DataType;
