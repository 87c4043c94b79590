//! Analyzer configuration

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Shards allotted per data node when a create statement names no count
    pub shards_per_data_node: u32,

    /// Lower bound of the derived default shard count (default: 4)
    pub min_default_shards: u32,

    /// Upper bound of the derived default shard count (default: 10)
    pub max_default_shards: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            shards_per_data_node: 2,
            min_default_shards: 4,
            max_default_shards: 10,
        }
    }
}

impl AnalyzerConfig {
    /// Create config for tests: a fixed shard count regardless of cluster size
    pub fn for_testing() -> Self {
        Self {
            shards_per_data_node: 1,
            min_default_shards: 1,
            max_default_shards: 1,
        }
    }

    /// Shard count for a new table when the statement doesn't name one.
    pub fn default_number_of_shards(&self, data_nodes: usize) -> u32 {
        let derived = u32::try_from(data_nodes)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.shards_per_data_node);
        derived.clamp(
            self.min_default_shards,
            self.max_default_shards.max(self.min_default_shards),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shards_clamped() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.default_number_of_shards(0), 4);
        assert_eq!(config.default_number_of_shards(1), 4);
        assert_eq!(config.default_number_of_shards(3), 6);
        assert_eq!(config.default_number_of_shards(5), 10);
        assert_eq!(config.default_number_of_shards(500), 10);
    }

    #[test]
    fn test_for_testing_is_fixed() {
        let config = AnalyzerConfig::for_testing();
        assert_eq!(config.default_number_of_shards(3), 1);
        assert_eq!(config.default_number_of_shards(0), 1);
    }
}
