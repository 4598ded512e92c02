//! Compile-time defaults and the runtime sizing knobs.

use crate::map::Growth;

pub const DEFAULT_NUM_BUCKETS: usize = 10; // buckets of a plain ChainedHashMap
pub const DEFAULT_INDEX_BUCKETS: usize = 100; // buckets of the kind map and the inventory
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Prefix of synthesized category node identifiers.
pub const CATEGORY_PREFIX: &str = "cat_";
/// Prefix of synthesized author node identifiers.
pub const AUTHOR_PREFIX: &str = "auth_";

/// Sizing of the maps backing a recommendation system or a book store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Bucket count of the graph adjacency map.
    pub graph_buckets: usize,
    /// Bucket count of the node-kind map and the book inventory.
    pub index_buckets: usize,
    /// Growth policy applied to every map built from this config.
    pub growth: Growth,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph_buckets: DEFAULT_NUM_BUCKETS,
            index_buckets: DEFAULT_INDEX_BUCKETS,
            growth: Growth::Fixed,
        }
    }
}

impl Config {
    pub fn with_growth(mut self, max_avg_bucket_size: usize) -> Self {
        self.growth = Growth::Grow {
            max_avg_bucket_size,
        };
        self
    }
}
