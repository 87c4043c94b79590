//! Partition names
//!
//! A partition of a partitioned table is stored in its own index, named
//! `[<schema>.].partitioned.<table>.<ident>`. The schema prefix is left out for
//! the default schema. `<ident>` is the lowercase hex form of the encoded
//! value list, so it round-trips exactly, nulls included, and distinct value
//! tuples never share an ident.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use strata_value::{Value, decode_value, encode_value};

use super::ident::{DEFAULT_SCHEMA_NAME, TableIdent};
use crate::error::{Error, Result};
use crate::types::DataType;

const PARTITIONED_MARKER: &str = ".partitioned.";

/// One partition of a table: the owning table and its ordered column values.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionName {
    table: TableIdent,
    values: Vec<Value>,
}

impl PartitionName {
    pub fn new(table: TableIdent, values: Vec<Value>) -> Self {
        Self { table, values }
    }

    /// Convert a value for the partition column `column` of type `data_type`
    /// into the string form partitions are keyed by. Null stays null.
    ///
    /// Timestamps are keyed by epoch milliseconds, numbers by their canonical
    /// decimal form. A value that doesn't fit the column type fails with
    /// `InvalidPropertyValue` naming the column.
    pub fn normalize_value(column: &str, data_type: &DataType, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let mismatch = || {
            Error::invalid_value(
                column,
                format!("cannot use {} '{}' as {}", value.type_name(), value, data_type),
            )
        };
        let key = match data_type {
            DataType::Timestamp => timestamp_millis(value).ok_or_else(mismatch)?.to_string(),
            DataType::Byte | DataType::Short | DataType::Integer | DataType::Long => {
                let i = integer(value).ok_or_else(mismatch)?;
                if !integer_fits(data_type, i) {
                    return Err(Error::invalid_value(
                        column,
                        format!("{} is out of range for {}", i, data_type),
                    ));
                }
                i.to_string()
            }
            DataType::Float | DataType::Double => match value {
                Value::Str(s) => s.trim().parse::<f64>().ok(),
                other => other.as_f64(),
            }
            .filter(|f| f.is_finite())
            .ok_or_else(mismatch)?
            .to_string(),
            DataType::Boolean => match value {
                Value::Bool(b) => b.to_string(),
                Value::Str(s) if s.eq_ignore_ascii_case("true") => "true".to_string(),
                Value::Str(s) if s.eq_ignore_ascii_case("false") => "false".to_string(),
                _ => return Err(mismatch()),
            },
            DataType::String | DataType::Ip => match value {
                Value::Str(s) => s.clone(),
                Value::Bytea(_) | Value::List(_) | Value::Map(_) => return Err(mismatch()),
                other => other.to_string(),
            },
            DataType::Object | DataType::GeoPoint | DataType::GeoShape | DataType::Array(_) => {
                return Err(mismatch());
            }
        };
        Ok(Value::Str(key))
    }

    pub fn table(&self) -> &TableIdent {
        &self.table
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The encoded value list.
    pub fn ident(&self) -> String {
        hex::encode(encode_value(&Value::List(self.values.clone())))
    }

    /// Full index name of this partition.
    pub fn as_index_name(&self) -> String {
        let prefix = if self.table.schema() == DEFAULT_SCHEMA_NAME {
            String::new()
        } else {
            format!("{}.", self.table.schema())
        };
        format!(
            "{}{}{}.{}",
            prefix,
            PARTITIONED_MARKER,
            self.table.name(),
            self.ident()
        )
    }

    /// Decode an index name produced by [`PartitionName::as_index_name`].
    ///
    /// Anything that isn't exactly such a name fails; there is no
    /// best-effort parsing.
    pub fn decode(index_name: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            Error::InvalidPartitionName(format!("{}: {}", index_name, reason))
        };

        let marker = index_name
            .find(PARTITIONED_MARKER)
            .ok_or_else(|| invalid("not a partition index name"))?;
        let schema = match &index_name[..marker] {
            "" => DEFAULT_SCHEMA_NAME,
            prefix => prefix
                .strip_suffix('.')
                .filter(|schema| !schema.is_empty())
                .ok_or_else(|| invalid("malformed schema prefix"))?,
        };
        let (table, ident) = index_name[marker + PARTITIONED_MARKER.len()..]
            .split_once('.')
            .ok_or_else(|| invalid("missing partition ident"))?;
        if table.is_empty() || ident.is_empty() {
            return Err(invalid("empty table name or partition ident"));
        }

        let bytes = hex::decode(ident).map_err(|e| invalid(&e.to_string()))?;
        let values = match decode_value(&bytes).map_err(|e| invalid(&e.to_string()))? {
            Value::List(values) => values,
            other => {
                return Err(invalid(&format!(
                    "expected a value list, found {}",
                    other.type_name()
                )));
            }
        };

        let table = TableIdent::try_new(schema, table).map_err(|e| invalid(&e.to_string()))?;
        let partition = Self::new(table, values);
        // Uppercase hex or an explicit default-schema prefix decode fine but
        // are not names this codec would produce.
        if partition.as_index_name() != index_name {
            return Err(invalid("not in canonical form"));
        }
        Ok(partition)
    }

    /// Decode an index name, requiring it to belong to `table`.
    pub fn decode_for(table: &TableIdent, index_name: &str) -> Result<Self> {
        let partition = Self::decode(index_name)?;
        if partition.table != *table {
            return Err(Error::InvalidPartitionName(format!(
                "{} belongs to table {}, not {}",
                index_name, partition.table, table
            )));
        }
        Ok(partition)
    }

    /// Whether the index name is a partition index name of any table.
    pub fn is_partition(index_name: &str) -> bool {
        Self::decode(index_name).is_ok()
    }
}

/// Integer value of an integer variant, an integral float or a numeric string.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Str(s) => s.trim().parse().ok(),
        Value::F32(_) | Value::F64(_) => value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64),
        other => other.as_i64(),
    }
}

fn integer_fits(data_type: &DataType, i: i64) -> bool {
    match data_type {
        DataType::Byte => i8::try_from(i).is_ok(),
        DataType::Short => i16::try_from(i).is_ok(),
        DataType::Integer => i32::try_from(i).is_ok(),
        _ => true,
    }
}

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Epoch milliseconds of a timestamp, an integer, or a string holding
/// either. Strings without an offset are read as UTC.
fn timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Timestamp(ts) => Some(ts.and_utc().timestamp_millis()),
        Value::Str(s) => {
            let s = s.trim();
            if let Ok(millis) = s.parse::<i64>() {
                return Some(millis);
            }
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.timestamp_millis());
            }
            TIMESTAMP_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .map(|ts| ts.and_utc().timestamp_millis())
        }
        other => integer(other),
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_index_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parted() -> TableIdent {
        TableIdent::new("doc", "parted")
    }

    fn values(raw: &[Option<&str>]) -> Vec<Value> {
        raw.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_round_trip_including_nulls() {
        let cases: Vec<Vec<Value>> = vec![
            values(&[Some("1395874800000")]),
            values(&[None]),
            values(&[None, Some("-100")]),
            values(&[Some(""), None, Some("x")]),
            vec![],
        ];
        for case in cases {
            let name = PartitionName::new(parted(), case.clone());
            let decoded = PartitionName::decode(&name.as_index_name()).unwrap();
            assert_eq!(decoded.table(), &parted());
            assert_eq!(decoded.values(), case.as_slice());
        }
    }

    #[test]
    fn test_custom_schema_round_trip() {
        let ident = TableIdent::new("custom", "parted");
        let name = PartitionName::new(ident.clone(), values(&[Some("a")]));
        let index_name = name.as_index_name();
        assert!(index_name.starts_with("custom..partitioned.parted."));
        assert_eq!(PartitionName::decode(&index_name).unwrap(), name);
    }

    #[test]
    fn test_default_schema_has_no_prefix() {
        let name = PartitionName::new(parted(), values(&[Some("a")]));
        assert!(name.as_index_name().starts_with(".partitioned.parted."));
    }

    #[test]
    fn test_null_distinct_from_every_string() {
        let null = PartitionName::new(parted(), values(&[None])).ident();
        for s in ["", "null", "NULL", "0"] {
            assert_ne!(PartitionName::new(parted(), values(&[Some(s)])).ident(), null);
        }
    }

    #[test]
    fn test_order_sensitive() {
        let ab = PartitionName::new(parted(), values(&[Some("a"), Some("b")]));
        let ba = PartitionName::new(parted(), values(&[Some("b"), Some("a")]));
        assert_ne!(ab.as_index_name(), ba.as_index_name());
    }

    #[test]
    fn test_table_is_part_of_name() {
        let a = PartitionName::new(parted(), values(&[Some("1")]));
        let b = PartitionName::new(TableIdent::new("doc", "other"), values(&[Some("1")]));
        assert_ne!(a.as_index_name(), b.as_index_name());
    }

    #[test]
    fn test_decode_for_foreign_table_fails() {
        let index_name = PartitionName::new(parted(), values(&[Some("1")])).as_index_name();
        assert!(PartitionName::decode_for(&parted(), &index_name).is_ok());
        assert!(matches!(
            PartitionName::decode_for(&TableIdent::new("doc", "users"), &index_name),
            Err(Error::InvalidPartitionName(_))
        ));
        assert!(matches!(
            PartitionName::decode_for(&TableIdent::new("custom", "parted"), &index_name),
            Err(Error::InvalidPartitionName(_))
        ));
    }

    #[test]
    fn test_malformed_names_fail() {
        let good = PartitionName::new(parted(), values(&[Some("1")])).as_index_name();
        let ident = PartitionName::new(parted(), values(&[Some("1")])).ident();
        let malformed = [
            "users".to_string(),
            ".partitioned.parted".to_string(),
            ".partitioned.parted.".to_string(),
            ".partitioned.parted.zz".to_string(),
            ".partitioned..0f".to_string(),
            format!("{}00", good),
            good.to_uppercase(),
            format!("doc.{}", good),
            // illegal table or schema names
            format!(".partitioned.a b.{}", ident),
            format!("_x..partitioned.t.{}", ident),
            format!(".partitioned._t.{}", ident),
            // a single string, not a list
            format!(".partitioned.parted.{}", hex::encode(encode_value(&Value::from("1")))),
        ];
        for name in malformed {
            assert!(
                matches!(PartitionName::decode(&name), Err(Error::InvalidPartitionName(_))),
                "{}",
                name
            );
            assert!(!PartitionName::is_partition(&name));
        }
        assert!(PartitionName::is_partition(&good));
    }

    #[test]
    fn test_normalize_value() {
        let normalize = |data_type: DataType, value: Value| {
            PartitionName::normalize_value("c", &data_type, &value)
        };
        assert_eq!(
            normalize(DataType::Long, Value::I64(1395874800000)),
            Ok(Value::from("1395874800000"))
        );
        assert_eq!(normalize(DataType::Integer, Value::from(" 7")), Ok(Value::from("7")));
        assert_eq!(normalize(DataType::Double, Value::I32(2)), Ok(Value::from("2")));
        assert_eq!(normalize(DataType::Double, Value::from("1.5")), Ok(Value::from("1.5")));
        assert_eq!(normalize(DataType::Boolean, Value::from("TRUE")), Ok(Value::from("true")));
        assert_eq!(normalize(DataType::String, Value::I32(0)), Ok(Value::from("0")));
        assert_eq!(normalize(DataType::String, Value::from("x")), Ok(Value::from("x")));
        assert_eq!(normalize(DataType::Timestamp, Value::Null), Ok(Value::Null));
    }

    #[test]
    fn test_normalize_timestamp_forms() {
        let expected = Ok(Value::from("1395874800000"));
        let ts = NaiveDate::from_ymd_opt(2014, 3, 26)
            .and_then(|d| d.and_hms_opt(23, 0, 0))
            .unwrap();
        for value in [
            Value::Timestamp(ts),
            Value::I64(1395874800000),
            Value::from("1395874800000"),
            Value::from("2014-03-26T23:00:00"),
            Value::from("2014-03-26 23:00:00.000"),
            Value::from("2014-03-27T00:00:00+01:00"),
        ] {
            assert_eq!(
                PartitionName::normalize_value("date", &DataType::Timestamp, &value),
                expected,
                "{:?}",
                value
            );
        }
        assert_eq!(
            PartitionName::normalize_value("date", &DataType::Timestamp, &Value::from("2014-03-27")),
            Ok(Value::from("1395878400000"))
        );
    }

    #[test]
    fn test_normalize_rejects_mismatched_types() {
        let cases = [
            (DataType::Timestamp, Value::from("foo")),
            (DataType::Timestamp, Value::Bool(true)),
            (DataType::Integer, Value::from("1.5")),
            (DataType::Integer, Value::F64(1.5)),
            (DataType::Byte, Value::I32(300)),
            (DataType::Double, Value::from("abc")),
            (DataType::Boolean, Value::I32(1)),
            (DataType::String, Value::List(vec![])),
        ];
        for (data_type, value) in cases {
            let err = PartitionName::normalize_value("c", &data_type, &value).unwrap_err();
            assert!(
                matches!(&err, Error::InvalidPropertyValue { property, .. } if property == "c"),
                "{} {:?}: {:?}",
                data_type,
                value,
                err
            );
        }
    }
}
