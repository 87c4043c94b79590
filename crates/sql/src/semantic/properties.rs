//! Table property schemas
//!
//! A property schema is a static table of recognized WITH/SET properties.
//! Each entry names the property, how its value is checked and converted,
//! where the converted value goes, its default, and whether it may be given
//! at create time, alter time or both. The tables are built once on first use
//! and are read-only afterwards.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use strata_value::Value;

use crate::error::{Error, Result};
use crate::semantic::settings::*;
use crate::semantic::statement::StatementKind;

/// When a property may be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    CreateOnly,
    AlterOnly,
    CreateAndAlter,
}

impl Applicability {
    fn allows(&self, statement: StatementKind) -> bool {
        match self {
            Applicability::CreateOnly => statement.is_create(),
            Applicability::AlterOnly => statement.is_alter(),
            Applicability::CreateAndAlter => statement.is_create() || statement.is_alter(),
        }
    }
}

/// Value shape a property accepts and how it's converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// An integer replica count, or an auto-expand range such as `0-all`.
    Replicas,
    Boolean,
    /// Integer >= 1.
    PositiveInteger,
    /// Integer >= min.
    Integer { min: i64 },
    /// Milliseconds, or a string such as `500ms`, `1s`, `2m`, `1h`, `1d`.
    TimeValue,
    /// Bytes, or a string such as `512mb`.
    ByteSize,
    /// Any string.
    Text,
    /// One of a fixed set of lowercase strings.
    OneOf(&'static [&'static str]),
    /// `dynamic` or `strict`, written to the mappings.
    ColumnPolicy,
    /// `quorum`, `quorum-1`, `full`, `full-1` or a shard count.
    InitialShards,
}

/// Default applied on create or on RESET.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Str(&'static str),
    Bool(bool),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            DefaultValue::Int(i) => Value::I64(i),
            DefaultValue::Str(s) => Value::from(s),
            DefaultValue::Bool(b) => Value::Bool(b),
        }
    }
}

/// One recognized property.
#[derive(Debug, Clone, PartialEq)]
pub struct TableProperty {
    pub name: &'static str,
    pub kind: PropertyKind,
    /// Settings (or mappings, for column policy) key written.
    pub key: &'static str,
    pub default: Option<DefaultValue>,
    pub applicability: Applicability,
}

static AUTO_EXPAND_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(all|\d+)$").expect("valid regex"));

static TIME_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(ms|s|m|h|d)?$").expect("valid regex"));

static BYTE_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(b|kb|mb|gb|tb)?$").expect("valid regex"));

const INITIAL_SHARDS: &[&str] = &["quorum", "quorum-1", "full", "full-1"];
const ALLOCATION_ENABLE: &[&str] = &["all", "primaries", "new_primaries", "none"];

/// Integer value, also accepting integral strings.
fn integer(property: &str, value: &Value) -> Result<i64> {
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    match value {
        Value::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_value(property, format!("'{}' is not a number", s))),
        other => Err(Error::invalid_value(
            property,
            format!("expected a number, got {}", other.type_name()),
        )),
    }
}

fn string<'v>(property: &str, value: &'v Value) -> Result<&'v str> {
    value.as_str().ok_or_else(|| {
        Error::invalid_value(
            property,
            format!("expected a string, got {}", value.type_name()),
        )
    })
}

fn scaled(property: &str, regex: &Regex, raw: &str, scale: impl Fn(&str) -> u64) -> Result<u64> {
    let lowered = raw.trim().to_lowercase();
    let captures = regex
        .captures(&lowered)
        .ok_or_else(|| Error::invalid_value(property, format!("cannot parse '{}'", raw)))?;
    let amount: u64 = captures[1]
        .parse()
        .map_err(|_| Error::invalid_value(property, format!("'{}' is out of range", raw)))?;
    let unit = captures.get(2).map_or("", |m| m.as_str());
    amount
        .checked_mul(scale(unit))
        .ok_or_else(|| Error::invalid_value(property, format!("'{}' is out of range", raw)))
}

fn non_negative(property: &str, value: &Value, regex: &Regex, scale: impl Fn(&str) -> u64) -> Result<u64> {
    if let Some(i) = value.as_i64() {
        return u64::try_from(i)
            .map_err(|_| Error::invalid_value(property, "must not be negative"));
    }
    scaled(property, regex, string(property, value)?, scale)
}

fn millis(unit: &str) -> u64 {
    match unit {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        _ => 1,
    }
}

fn bytes(unit: &str) -> u64 {
    match unit {
        "kb" => 1 << 10,
        "mb" => 1 << 20,
        "gb" => 1 << 30,
        "tb" => 1 << 40,
        _ => 1,
    }
}

impl TableProperty {
    /// Check `value` and write its converted form into `out`.
    pub fn apply(&self, value: &Value, out: &mut TableParameter) -> Result<()> {
        let name = self.name;
        match self.kind {
            PropertyKind::Replicas => {
                let (replicas, auto_expand) = self.replicas(value)?;
                out.settings_mut().put(SETTING_NUMBER_OF_REPLICAS, replicas);
                out.settings_mut().put(SETTING_AUTO_EXPAND_REPLICAS, auto_expand);
            }
            PropertyKind::Boolean => {
                let flag = match value {
                    Value::Bool(b) => *b,
                    Value::Str(s) if s.eq_ignore_ascii_case("true") => true,
                    Value::Str(s) if s.eq_ignore_ascii_case("false") => false,
                    other => {
                        return Err(Error::invalid_value(
                            name,
                            format!("expected a boolean, got {}", other),
                        ));
                    }
                };
                out.settings_mut().put(self.key, flag);
            }
            PropertyKind::PositiveInteger => {
                let n = integer(name, value)?;
                if n < 1 {
                    return Err(Error::invalid_value(name, format!("{} must be greater than 0", n)));
                }
                out.settings_mut().put(self.key, n);
            }
            PropertyKind::Integer { min } => {
                let n = integer(name, value)?;
                if n < min {
                    return Err(Error::invalid_value(
                        name,
                        format!("{} must be at least {}", n, min),
                    ));
                }
                out.settings_mut().put(self.key, n);
            }
            PropertyKind::TimeValue => {
                let ms = non_negative(name, value, &TIME_VALUE, millis)?;
                out.settings_mut().put(self.key, format!("{}ms", ms));
            }
            PropertyKind::ByteSize => {
                let size = non_negative(name, value, &BYTE_SIZE, bytes)?;
                out.settings_mut().put(self.key, format!("{}b", size));
            }
            PropertyKind::Text => {
                out.settings_mut().put(self.key, string(name, value)?);
            }
            PropertyKind::OneOf(options) => {
                let choice = string(name, value)?.to_lowercase();
                if !options.contains(&choice.as_str()) {
                    return Err(Error::invalid_value(
                        name,
                        format!("'{}' is not one of {}", choice, options.join(", ")),
                    ));
                }
                out.settings_mut().put(self.key, choice);
            }
            PropertyKind::ColumnPolicy => {
                let mapped = match string(name, value)?.to_lowercase().as_str() {
                    "dynamic" => "true",
                    "strict" => "strict",
                    other => {
                        return Err(Error::invalid_value(
                            name,
                            format!("'{}' is not one of dynamic, strict", other),
                        ));
                    }
                };
                out.mappings_mut().put(self.key, mapped);
            }
            PropertyKind::InitialShards => {
                let shards = match value {
                    Value::Str(s) if INITIAL_SHARDS.contains(&s.to_lowercase().as_str()) => {
                        s.to_lowercase()
                    }
                    other => {
                        let n = integer(name, other)?;
                        if n < 0 {
                            return Err(Error::invalid_value(name, "must not be negative"));
                        }
                        n.to_string()
                    }
                };
                out.settings_mut().put(self.key, shards);
            }
        }
        Ok(())
    }

    /// Replica count and auto-expand setting for a replica spec.
    fn replicas(&self, value: &Value) -> Result<(i64, String)> {
        let fixed = |n: i64| {
            if n < 0 {
                Err(Error::invalid_value(self.name, "must not be negative"))
            } else {
                Ok((n, "false".to_string()))
            }
        };
        if let Some(n) = value.as_i64() {
            return fixed(n);
        }
        let spec = string(self.name, value)?.trim();
        if let Ok(n) = spec.parse::<i64>() {
            return fixed(n);
        }
        let captures = AUTO_EXPAND_RANGE.captures(spec).ok_or_else(|| {
            Error::invalid_value(
                self.name,
                format!("the \"number_of_replicas\" range \"{}\" isn't valid", spec),
            )
        })?;
        let lower: i64 = captures[1]
            .parse()
            .map_err(|_| Error::invalid_value(self.name, format!("'{}' is out of range", spec)))?;
        if &captures[2] != "all" {
            let upper: i64 = captures[2].parse().map_err(|_| {
                Error::invalid_value(self.name, format!("'{}' is out of range", spec))
            })?;
            if upper < lower {
                return Err(Error::invalid_value(
                    self.name,
                    format!("the \"number_of_replicas\" range \"{}\" isn't valid", spec),
                ));
            }
        }
        Ok((lower, spec.to_string()))
    }

    /// Read the property back out of converted settings, in a form `apply`
    /// accepts and maps to the same settings.
    pub fn extract(&self, param: &TableParameter) -> Option<Value> {
        let settings = param.settings();
        match self.kind {
            PropertyKind::Replicas => match settings.get(SETTING_AUTO_EXPAND_REPLICAS) {
                Some(range) if range != "false" => Some(Value::from(range)),
                _ => settings.get_as_i64(SETTING_NUMBER_OF_REPLICAS).map(Value::I64),
            },
            PropertyKind::Boolean => settings.get_as_bool(self.key).map(Value::Bool),
            PropertyKind::PositiveInteger | PropertyKind::Integer { .. } => {
                settings.get_as_i64(self.key).map(Value::I64)
            }
            PropertyKind::TimeValue
            | PropertyKind::ByteSize
            | PropertyKind::Text
            | PropertyKind::OneOf(_)
            | PropertyKind::InitialShards => settings.get(self.key).map(Value::from),
            PropertyKind::ColumnPolicy => param.mappings().get(self.key).map(|mapped| {
                Value::from(if mapped == "strict" { "strict" } else { "dynamic" })
            }),
        }
    }
}

/// A named set of recognized properties.
#[derive(Debug)]
pub struct PropertySchema {
    properties: BTreeMap<&'static str, TableProperty>,
}

impl PropertySchema {
    fn new(properties: Vec<TableProperty>) -> Self {
        Self {
            properties: properties.into_iter().map(|p| (p.name, p)).collect(),
        }
    }

    /// The schema for a statement kind: blob statements use the blob table
    /// schema, everything else the doc table schema.
    pub fn for_statement(statement: StatementKind) -> &'static PropertySchema {
        if statement.is_blob() {
            &BLOB_TABLE_PROPERTIES
        } else {
            &TABLE_PROPERTIES
        }
    }

    pub fn get(&self, name: &str) -> Option<&TableProperty> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &TableProperty> {
        self.properties.values()
    }

    /// Look up a property the statement may use.
    fn applicable(&self, name: &str, statement: StatementKind) -> Result<&TableProperty> {
        self.properties
            .get(name)
            .filter(|p| p.applicability.allows(statement))
            .ok_or_else(|| Error::InvalidProperty {
                property: name.to_string(),
                statement,
            })
    }

    /// Validate and convert user-supplied properties.
    ///
    /// Every key is checked against the schema before any value is converted,
    /// so an unknown key is reported no matter what value it carries. Keys are
    /// walked in sorted order. With `with_defaults`, properties that have a
    /// default and weren't supplied are filled in first.
    pub fn validate(
        &self,
        properties: &BTreeMap<String, Value>,
        statement: StatementKind,
        with_defaults: bool,
    ) -> Result<TableParameter> {
        let resolved = properties
            .iter()
            .map(|(name, value)| Ok((self.applicable(name, statement)?, value)))
            .collect::<Result<Vec<_>>>()?;

        let mut out = if with_defaults {
            self.defaults(statement)?
        } else {
            TableParameter::new()
        };
        for (property, value) in resolved {
            property.apply(value, &mut out)?;
        }
        Ok(out)
    }

    /// Defaults of every property applicable to the statement.
    pub fn defaults(&self, statement: StatementKind) -> Result<TableParameter> {
        let mut out = TableParameter::new();
        for property in self.properties.values() {
            if let (Some(default), true) = (property.default, property.applicability.allows(statement)) {
                property.apply(&default.to_value(), &mut out)?;
            }
        }
        Ok(out)
    }

    /// Settings that put the named properties back to their defaults.
    pub fn reset(&self, names: &[String], statement: StatementKind) -> Result<TableParameter> {
        let resolved = names
            .iter()
            .map(|name| self.applicable(name, statement))
            .collect::<Result<Vec<_>>>()?;

        let mut out = TableParameter::new();
        for property in resolved {
            let default = property.default.ok_or_else(|| {
                Error::invalid_value(property.name, "property has no default and cannot be reset")
            })?;
            property.apply(&default.to_value(), &mut out)?;
        }
        Ok(out)
    }

    /// Map converted settings back to property values.
    pub fn extract(&self, param: &TableParameter) -> BTreeMap<String, Value> {
        self.properties
            .values()
            .filter_map(|p| p.extract(param).map(|v| (p.name.to_string(), v)))
            .collect()
    }
}

fn property(
    name: &'static str,
    kind: PropertyKind,
    key: &'static str,
    default: Option<DefaultValue>,
    applicability: Applicability,
) -> TableProperty {
    TableProperty {
        name,
        kind,
        key,
        default,
        applicability,
    }
}

fn number_of_replicas() -> TableProperty {
    property(
        "number_of_replicas",
        PropertyKind::Replicas,
        SETTING_NUMBER_OF_REPLICAS,
        Some(DefaultValue::Str("0-1")),
        Applicability::CreateAndAlter,
    )
}

/// Properties of doc tables.
pub static TABLE_PROPERTIES: LazyLock<PropertySchema> = LazyLock::new(|| {
    use Applicability::*;
    use DefaultValue::*;

    PropertySchema::new(vec![
        number_of_replicas(),
        property("refresh_interval", PropertyKind::TimeValue, SETTING_REFRESH_INTERVAL, Some(Int(1000)), CreateAndAlter),
        // The shard count of a new table comes from CLUSTERED INTO
        property("number_of_shards", PropertyKind::PositiveInteger, SETTING_NUMBER_OF_SHARDS, None, AlterOnly),
        property("blocks.read_only", PropertyKind::Boolean, SETTING_BLOCKS_READ_ONLY, Some(Bool(false)), CreateAndAlter),
        property("blocks.read", PropertyKind::Boolean, SETTING_BLOCKS_READ, Some(Bool(false)), CreateAndAlter),
        property("blocks.write", PropertyKind::Boolean, SETTING_BLOCKS_WRITE, Some(Bool(false)), CreateAndAlter),
        property("blocks.metadata", PropertyKind::Boolean, SETTING_BLOCKS_METADATA, Some(Bool(false)), CreateAndAlter),
        property("translog.flush_threshold_size", PropertyKind::ByteSize, SETTING_TRANSLOG_FLUSH_THRESHOLD_SIZE, Some(Str("512mb")), CreateAndAlter),
        property("routing.allocation.enable", PropertyKind::OneOf(ALLOCATION_ENABLE), SETTING_ROUTING_ALLOCATION_ENABLE, Some(Str("all")), CreateAndAlter),
        property("routing.allocation.total_shards_per_node", PropertyKind::Integer { min: -1 }, SETTING_TOTAL_SHARDS_PER_NODE, Some(Int(-1)), CreateAndAlter),
        property("recovery.initial_shards", PropertyKind::InitialShards, SETTING_RECOVERY_INITIAL_SHARDS, Some(Str("quorum")), CreateAndAlter),
        property("warmer.enabled", PropertyKind::Boolean, SETTING_WARMER_ENABLED, Some(Bool(true)), CreateAndAlter),
        property("unassigned.node_left.delayed_timeout", PropertyKind::TimeValue, SETTING_NODE_LEFT_DELAYED_TIMEOUT, Some(Int(60_000)), CreateAndAlter),
        property("column_policy", PropertyKind::ColumnPolicy, MAPPING_DYNAMIC, Some(Str("dynamic")), CreateAndAlter),
    ])
});

/// Properties of blob tables.
pub static BLOB_TABLE_PROPERTIES: LazyLock<PropertySchema> = LazyLock::new(|| {
    PropertySchema::new(vec![
        number_of_replicas(),
        property(
            "blobs_path",
            PropertyKind::Text,
            SETTING_BLOBS_PATH,
            None,
            Applicability::CreateOnly,
        ),
    ])
});
