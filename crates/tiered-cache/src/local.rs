//! In-process cache tier
//!
//! Entries carry their own TTL, measured from the moment they were set.
//! Reads never extend an entry's lifetime.

use moka::future::Cache;
use moka::Expiry;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct LocalEntry {
    value: Arc<dyn Any + Send + Sync>,
    ttl: Duration,
    inserted_at: Instant,
}

/// Expires every entry `ttl` after its last write
struct WriteTtl;

impl Expiry<String, LocalEntry> for WriteTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &LocalEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &LocalEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Typed in-process key/value cache with per-key TTL
///
/// Cloning is cheap and yields a handle to the same underlying store.
#[derive(Clone)]
pub struct LocalCache {
    entries: Cache<String, LocalEntry>,
}

impl LocalCache {
    /// Create a cache bounded to `max_capacity` entries
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(WriteTtl)
            .build();

        Self { entries }
    }

    /// Get a value. Expired keys, and keys holding a value of another type, read as absent.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entry = self.entries.get(key).await?;
        let value = entry.value.downcast_ref::<T>().cloned();
        if value.is_none() {
            debug!(key, "Local entry holds a different type, treating as miss");
        }
        value
    }

    /// Store a value that expires `ttl` from now, replacing any previous entry
    pub async fn set<T>(&self, key: &str, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let entry = LocalEntry {
            value: Arc::new(value),
            ttl,
            inserted_at: Instant::now(),
        };
        self.entries.insert(key.to_string(), entry).await;
    }

    pub async fn remove(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Remaining lifetime of a live entry
    pub async fn time_to_live(&self, key: &str) -> Option<Duration> {
        let entry = self.entries.get(key).await?;
        entry.ttl.checked_sub(entry.inserted_at.elapsed())
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = LocalCache::default();
        cache
            .set("users", vec![1u32, 2, 3], Duration::from_secs(60))
            .await;

        let value: Option<Vec<u32>> = cache.get("users").await;
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let cache = LocalCache::default();
        assert!(cache.get::<String>("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = LocalCache::default();
        cache
            .set("user:1", "alice".to_string(), Duration::from_millis(50))
            .await;
        assert!(cache.get::<String>("user:1").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get::<String>("user:1").await.is_none());
        assert!(cache.time_to_live("user:1").await.is_none());
    }

    #[tokio::test]
    async fn test_reads_do_not_extend_ttl() {
        let cache = LocalCache::default();
        cache
            .set("posts", "p".to_string(), Duration::from_millis(150))
            .await;

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(40)).await;
            let _ = cache.get::<String>("posts").await;
        }
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get::<String>("posts").await.is_none());
    }

    #[tokio::test]
    async fn test_type_mismatch_is_miss() {
        let cache = LocalCache::default();
        cache.set("user:2", 42u64, Duration::from_secs(60)).await;
        assert!(cache.get::<String>("user:2").await.is_none());
        assert_eq!(cache.get::<u64>("user:2").await, Some(42));
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = LocalCache::default();
        cache.set("user:3", 7i32, Duration::from_secs(60)).await;
        cache.remove("user:3").await;
        assert!(cache.get::<i32>("user:3").await.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let cache = LocalCache::default();
        cache.set("k", 1i32, Duration::from_secs(1)).await;
        cache.set("k", 2i32, Duration::from_secs(600)).await;

        assert_eq!(cache.get::<i32>("k").await, Some(2));
        let ttl = cache.time_to_live("k").await.unwrap();
        assert!(ttl > Duration::from_secs(590));
    }
}
