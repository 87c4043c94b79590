//! Validated table settings handed to the cluster-mutation path

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SETTING_NUMBER_OF_SHARDS: &str = "index.number_of_shards";
pub const SETTING_NUMBER_OF_REPLICAS: &str = "index.number_of_replicas";
pub const SETTING_AUTO_EXPAND_REPLICAS: &str = "index.auto_expand_replicas";
pub const SETTING_REFRESH_INTERVAL: &str = "index.refresh_interval";
pub const SETTING_BLOBS_PATH: &str = "index.blobs.path";
pub const SETTING_BLOCKS_READ_ONLY: &str = "index.blocks.read_only";
pub const SETTING_BLOCKS_READ: &str = "index.blocks.read";
pub const SETTING_BLOCKS_WRITE: &str = "index.blocks.write";
pub const SETTING_BLOCKS_METADATA: &str = "index.blocks.metadata";
pub const SETTING_TRANSLOG_FLUSH_THRESHOLD_SIZE: &str = "index.translog.flush_threshold_size";
pub const SETTING_ROUTING_ALLOCATION_ENABLE: &str = "index.routing.allocation.enable";
pub const SETTING_TOTAL_SHARDS_PER_NODE: &str = "index.routing.allocation.total_shards_per_node";
pub const SETTING_RECOVERY_INITIAL_SHARDS: &str = "index.recovery.initial_shards";
pub const SETTING_WARMER_ENABLED: &str = "index.warmer.enabled";
pub const SETTING_NODE_LEFT_DELAYED_TIMEOUT: &str = "index.unassigned.node_left.delayed_timeout";

/// Mapping key carrying the column policy.
pub const MAPPING_DYNAMIC: &str = "dynamic";

/// Flat, sorted string settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn get_as_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.parse().ok()
    }

    pub fn get_as_i32(&self, key: &str) -> Option<i32> {
        self.get(key)?.parse().ok()
    }

    pub fn get_as_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.parse().ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Settings and mappings produced for one statement. Never shared between
/// statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableParameter {
    settings: Settings,
    mappings: Settings,
}

impl TableParameter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mappings(&self) -> &Settings {
        &self.mappings
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub(crate) fn mappings_mut(&mut self) -> &mut Settings {
        &mut self.mappings
    }

    pub fn into_parts(self) -> (Settings, Settings) {
        (self.settings, self.mappings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let mut settings = Settings::new();
        settings.put(SETTING_NUMBER_OF_SHARDS, 10);
        settings.put(SETTING_AUTO_EXPAND_REPLICAS, "0-all");
        settings.put(SETTING_BLOCKS_READ_ONLY, true);
        assert_eq!(settings.get_as_i32(SETTING_NUMBER_OF_SHARDS), Some(10));
        assert_eq!(settings.get_as_i32(SETTING_AUTO_EXPAND_REPLICAS), None);
        assert_eq!(settings.get(SETTING_AUTO_EXPAND_REPLICAS), Some("0-all"));
        assert_eq!(settings.get_as_bool(SETTING_BLOCKS_READ_ONLY), Some(true));
        assert_eq!(settings.len(), 3);
        assert!(!settings.contains(SETTING_BLOBS_PATH));
    }
}
