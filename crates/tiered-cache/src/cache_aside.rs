//! Read-through lookup across the local tier, the remote tier and an upstream
//!
//! Tier order for every read:
//! 1. local tier: a hit returns immediately
//! 2. remote tier: a decodable hit is copied into the local tier and returned;
//!    an undecodable or null payload is a soft miss
//! 3. upstream: the raw body goes to the remote tier, the decoded value to the
//!    local tier, then the value is returned
//!
//! Remote tier failures are best effort: they are reported through
//! [`Lookup::failures`] and left to the caller to log.
//! Concurrent misses on one key each reach the upstream; the writes are
//! idempotent so the last one wins.

use crate::error::{Result, TierError};
use crate::local::LocalCache;
use crate::lookup::{Lookup, Tier, TierFailure};
use crate::remote::RemoteCache;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Local tier TTL
pub const DEFAULT_LOCAL_TTL: Duration = Duration::from_secs(10 * 60);
/// Remote tier TTL
pub const DEFAULT_REMOTE_TTL: Duration = Duration::from_secs(60 * 60);

/// Expiry applied to each tier on write
///
/// The local TTL must not exceed the remote TTL, so a local entry never
/// outlives the remote entry written alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub local: Duration,
    pub remote: Duration,
}

impl TtlPolicy {
    pub fn is_consistent(&self) -> bool {
        !self.local.is_zero() && self.local <= self.remote
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            local: DEFAULT_LOCAL_TTL,
            remote: DEFAULT_REMOTE_TTL,
        }
    }
}

/// Two-tier cache-aside engine
pub struct CacheAside {
    local: LocalCache,
    remote: Arc<dyn RemoteCache>,
    ttl: TtlPolicy,
}

impl CacheAside {
    pub fn new(local: LocalCache, remote: Arc<dyn RemoteCache>, ttl: TtlPolicy) -> Self {
        Self { local, remote, ttl }
    }

    pub fn local(&self) -> &LocalCache {
        &self.local
    }

    pub fn remote(&self) -> &dyn RemoteCache {
        self.remote.as_ref()
    }

    pub fn ttl(&self) -> TtlPolicy {
        self.ttl
    }

    /// Read `key` through both tiers, calling `fetch` only on a full miss.
    ///
    /// `fetch` yields the raw upstream body and its decoded value (`None` for
    /// an empty or null body). An empty upstream result populates no tier,
    /// not even the remote one: a stored null would only ever soft-miss.
    /// Only a `fetch` error fails the read; nothing is cached in that case.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: &str,
        fetch: F,
    ) -> std::result::Result<Lookup<Option<T>>, E>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<(String, Option<T>), E>>,
    {
        if let Some(value) = self.local.get::<T>(key).await {
            debug!(key, "Local tier hit");
            return Ok(Lookup::new(Some(value), Tier::Local));
        }

        let mut failures = Vec::new();

        match self.probe_remote::<T>(key).await {
            Ok(Some(value)) => {
                debug!(key, "Remote tier hit, refreshing local tier");
                self.local.set(key, value.clone(), self.ttl.local).await;
                return Ok(Lookup::new(Some(value), Tier::Remote));
            }
            Ok(None) => debug!(key, "Remote tier miss"),
            Err(e) => {
                debug!(key, error = %e, "Remote tier probe failed, falling through to upstream");
                failures.push(TierFailure::RemoteProbe(e));
            }
        }

        let (body, value) = fetch().await?;

        match value {
            Some(ref value) => {
                // Remote first: the local entry is always the younger one
                if let Err(e) = self.write_remote(key, &body).await {
                    debug!(key, error = %e, "Failed to populate remote tier");
                    failures.push(TierFailure::RemoteWrite(e));
                }
                self.local.set(key, value.clone(), self.ttl.local).await;
                debug!(key, "Populated cache tiers from upstream");
            }
            None => debug!(key, "Upstream returned an empty body, nothing cached"),
        }

        Ok(Lookup {
            value,
            source: Tier::Upstream,
            failures,
        })
    }

    /// Drop `key` from both tiers. Returns whether the remote tier held it.
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        self.local.remove(key).await;
        self.remote.delete(key).await
    }

    async fn probe_remote<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        if !self.remote.exists(key).await? {
            return Ok(None);
        }

        // Expired between EXISTS and GET
        let Some(text) = self.remote.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Option<T>>(&text) {
            Ok(value) => {
                if value.is_none() {
                    debug!(key, "Remote tier holds a null payload, treating as miss");
                }
                Ok(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Remote tier payload is undecodable, treating as miss");
                Ok(None)
            }
        }
    }

    async fn write_remote(&self, key: &str, body: &str) -> Result<()> {
        if self.remote.set(key, body, self.ttl.remote).await? {
            Ok(())
        } else {
            Err(TierError::StoreUnavailable(
                "write was not acknowledged".to_string(),
            ))
        }
    }
}
