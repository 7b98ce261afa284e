use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tiered_cache::TtlPolicy;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub upstream_url: String,
    pub avatar_url: String,
    pub avatar_cache_dir: PathBuf,
    pub ttl: TtlPolicy,
    pub local_cache_capacity: u64,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |name: &str| lookup(name).and_then(|v| v.parse::<u64>().ok());

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let redis_url = lookup("REDIS_URL").unwrap_or(defaults.redis_url);
        let upstream_url = lookup("UPSTREAM_URL").unwrap_or(defaults.upstream_url);
        let avatar_url = lookup("AVATAR_URL").unwrap_or(defaults.avatar_url);

        let avatar_cache_dir = lookup("AVATAR_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.avatar_cache_dir);

        let ttl = TtlPolicy {
            local: parsed("LOCAL_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl.local),
            remote: parsed("REMOTE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl.remote),
        };

        let local_cache_capacity =
            parsed("LOCAL_CACHE_CAPACITY").unwrap_or(defaults.local_cache_capacity);

        Self {
            port,
            redis_url,
            upstream_url,
            avatar_url,
            avatar_cache_dir,
            ttl,
            local_cache_capacity,
        }
    }

    /// Reject TTLs that would let a local entry outlive its remote copy
    pub fn validate(&self) -> Result<(), String> {
        if !self.ttl.is_consistent() {
            return Err(format!(
                "local TTL ({}s) must be non-zero and no longer than remote TTL ({}s)",
                self.ttl.local.as_secs(),
                self.ttl.remote.as_secs()
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            redis_url: "redis://localhost:6379".to_string(),
            upstream_url: "https://jsonplaceholder.typicode.com".to_string(),
            avatar_url: "https://i.pravatar.cc/150".to_string(),
            avatar_cache_dir: PathBuf::from("./wwwroot/cache/avatars"),
            ttl: TtlPolicy::default(),
            local_cache_capacity: 10_000,
        }
    }
}
