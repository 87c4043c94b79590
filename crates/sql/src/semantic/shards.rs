//! Shard count of new tables

use strata_value::Value;

use crate::config::AnalyzerConfig;
use crate::error::{Error, Result};

/// Convert a bound `CLUSTERED INTO` value to a shard count.
pub fn number_of_shards(value: &Value) -> Result<u32> {
    let shards = match value {
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidNumber(s.clone()))?,
        other => other
            .as_i64()
            .ok_or_else(|| Error::InvalidNumber(other.to_string()))?,
    };
    if shards < 1 {
        return Err(Error::InvalidArgument(
            "num_shards in CLUSTERED clause must be greater than 0".into(),
        ));
    }
    u32::try_from(shards).map_err(|_| Error::InvalidNumber(shards.to_string()))
}

/// The bound shard count, or the cluster-derived default.
pub fn resolve_number_of_shards(
    value: Option<&Value>,
    config: &AnalyzerConfig,
    data_nodes: usize,
) -> Result<u32> {
    match value {
        Some(value) => number_of_shards(value),
        None => Ok(config.default_number_of_shards(data_nodes)),
    }
}
