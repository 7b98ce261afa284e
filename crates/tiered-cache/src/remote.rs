//! Shared cache tier
//!
//! Values are stored as text; callers own serialization. Every operation can
//! fail with [`TierError::StoreUnavailable`], which is distinct from a key
//! simply being absent.

use crate::error::{Result, TierError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::info;

/// A network-accessible key/value store with TTL support
#[async_trait]
pub trait RemoteCache: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` for `ttl`. Returns whether the store acknowledged the write.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Returns whether a key was removed
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// Redis-backed remote tier
///
/// The connection is opened once and multiplexed; the manager reconnects on
/// its own after a dropped connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis at `url` (e.g. `redis://localhost:6379`)
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!(url, "Connected to remote cache");
        Ok(Self { conn })
    }
}

#[async_trait]
impl RemoteCache for RedisCache {
    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }
}

struct StoredValue {
    value: String,
    ttl: Duration,
    stored_at: Instant,
}

impl StoredValue {
    fn remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.stored_at.elapsed())
    }
}

/// In-memory remote tier for tests
///
/// Can be switched offline to simulate an unreachable store.
#[derive(Default)]
pub struct MemoryRemoteCache {
    entries: RwLock<HashMap<String, StoredValue>>,
    offline: AtomicBool,
}

impl MemoryRemoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `StoreUnavailable` (or recover)
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Remaining lifetime of a live key
    pub async fn time_to_live(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        entries.get(key).and_then(StoredValue::remaining)
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TierError::StoreUnavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteCache for MemoryRemoteCache {
    async fn exists(&self, key: &str) -> Result<bool> {
        self.ensure_online()?;
        let entries = self.entries.read().await;
        Ok(entries.get(key).and_then(StoredValue::remaining).is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.ensure_online()?;
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|stored| stored.remaining().is_some())
            .map(|stored| stored.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        self.ensure_online()?;
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                ttl,
                stored_at: Instant::now(),
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.ensure_online()?;
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(key)
            .is_some_and(|stored| stored.remaining().is_some()))
    }
}
