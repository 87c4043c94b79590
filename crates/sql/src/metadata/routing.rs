//! Shard routing snapshot

use std::collections::BTreeMap;

/// node id -> index name -> shard ids, as reported by cluster coordination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routing {
    locations: BTreeMap<String, BTreeMap<String, Vec<u32>>>,
}

impl Routing {
    pub fn new(locations: BTreeMap<String, BTreeMap<String, Vec<u32>>>) -> Self {
        Self { locations }
    }

    /// Add shard ids of `index` located on `node`.
    pub fn with_shards(mut self, node: &str, index: &str, shards: impl IntoIterator<Item = u32>) -> Self {
        let entry = self
            .locations
            .entry(node.to_string())
            .or_default()
            .entry(index.to_string())
            .or_default();
        entry.extend(shards);
        entry.sort_unstable();
        entry.dedup();
        self
    }

    pub fn locations(&self) -> &BTreeMap<String, BTreeMap<String, Vec<u32>>> {
        &self.locations
    }

    pub fn has_locations(&self) -> bool {
        !self.locations.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    /// Total number of shard copies across all nodes and indices.
    pub fn shard_count(&self) -> usize {
        self.locations
            .values()
            .flat_map(|indices| indices.values())
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_builder() {
        let routing = Routing::default()
            .with_shards("node_one", "t1", [2, 1])
            .with_shards("node_two", "t1", [3, 4])
            .with_shards("node_one", "t1", [1]);
        assert_eq!(routing.node_ids().collect::<Vec<_>>(), vec!["node_one", "node_two"]);
        assert_eq!(routing.locations()["node_one"]["t1"], vec![1, 2]);
        assert_eq!(routing.shard_count(), 4);
        assert!(!Routing::default().has_locations());
    }
}
