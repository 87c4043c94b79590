//! Column data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column data types known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    String,
    Timestamp,
    Ip,
    Object,
    GeoPoint,
    GeoShape,
    Array(Box<DataType>),
}

impl DataType {
    /// Parse a type name as written in a column definition.
    pub fn from_name(name: &str) -> Option<Self> {
        let data_type = match name.to_lowercase().as_str() {
            "boolean" | "bool" => DataType::Boolean,
            "byte" | "tinyint" => DataType::Byte,
            "short" | "smallint" => DataType::Short,
            "integer" | "int" => DataType::Integer,
            "long" | "bigint" => DataType::Long,
            "float" | "real" => DataType::Float,
            "double" => DataType::Double,
            "string" | "text" | "varchar" => DataType::String,
            "timestamp" => DataType::Timestamp,
            "ip" => DataType::Ip,
            "object" => DataType::Object,
            "geo_point" => DataType::GeoPoint,
            "geo_shape" => DataType::GeoShape,
            _ => return None,
        };
        Some(data_type)
    }

    /// Primitive types can serve as primary key, routing or partition columns.
    pub fn is_primitive(&self) -> bool {
        !matches!(
            self,
            DataType::Object | DataType::GeoPoint | DataType::GeoShape | DataType::Array(_)
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "boolean"),
            DataType::Byte => write!(f, "byte"),
            DataType::Short => write!(f, "short"),
            DataType::Integer => write!(f, "integer"),
            DataType::Long => write!(f, "long"),
            DataType::Float => write!(f, "float"),
            DataType::Double => write!(f, "double"),
            DataType::String => write!(f, "string"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Ip => write!(f, "ip"),
            DataType::Object => write!(f, "object"),
            DataType::GeoPoint => write!(f, "geo_point"),
            DataType::GeoShape => write!(f, "geo_shape"),
            DataType::Array(inner) => write!(f, "array({})", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(DataType::from_name("BIGINT"), Some(DataType::Long));
        assert_eq!(DataType::from_name("text"), Some(DataType::String));
        assert_eq!(DataType::from_name("uuid"), None);
    }

    #[test]
    fn test_primitive() {
        assert!(DataType::Timestamp.is_primitive());
        assert!(!DataType::Array(Box::new(DataType::Long)).is_primitive());
        assert!(!DataType::Object.is_primitive());
    }
}
