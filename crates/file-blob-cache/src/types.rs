//! Cache types

use serde::{Deserialize, Serialize};

/// Raw bytes plus a content-type label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// The outcome of a cache read
#[derive(Debug)]
pub struct Blob {
    pub entry: BlobEntry,
    pub from_cache: bool,
    /// Set when a fetched blob could not be written to disk
    pub persist_error: Option<std::io::Error>,
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub write_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.write_failures, 0);
    }

    #[test]
    fn test_cache_stats_serialization() {
        let stats = CacheStats {
            hits: 12,
            misses: 3,
            write_failures: 1,
        };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"hits\":12"));
        assert!(json.contains("\"write_failures\":1"));
    }
}
