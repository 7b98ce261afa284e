//! Caching demo backend
//!
//! Proxies the JSONPlaceholder users/posts API through a two-tier cache
//! (in-process over Redis) and serves avatar images from a disk cache.

mod avatar;
mod catalog;
mod config;
mod error;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use crate::avatar::AvatarSource;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::StartupError;
use crate::state::AppState;
use file_blob_cache::ContentBlobCache;
use jsonplaceholder_client::PlaceholderClient;
use std::sync::Arc;
use tiered_cache::{CacheAside, LocalCache, RedisCache};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    init_tracing()?;

    info!("Starting caching demo...");

    let config = Config::from_env();
    config.validate().map_err(StartupError::Config)?;
    info!(port = config.port, "Port");
    info!(upstream = %config.upstream_url, "Record upstream");
    info!(cache_dir = ?config.avatar_cache_dir, "Avatar cache dir");
    info!(
        local_ttl_secs = config.ttl.local.as_secs(),
        remote_ttl_secs = config.ttl.remote.as_secs(),
        "Cache TTLs"
    );

    // One outbound connection pool for both upstreams
    let http = reqwest::Client::new();

    let remote = RedisCache::connect(&config.redis_url).await?;
    let cache = CacheAside::new(
        LocalCache::new(config.local_cache_capacity),
        Arc::new(remote),
        config.ttl,
    );
    let fetcher = PlaceholderClient::with_client(http.clone(), &config.upstream_url);
    let catalog = Catalog::new(cache, Arc::new(fetcher));

    let avatars = ContentBlobCache::new(
        config.avatar_cache_dir.clone(),
        Arc::new(AvatarSource::new(http, &config.avatar_url)),
    );
    avatars.init().await?;

    let state = AppState::new(catalog, avatars);

    routes::start_server(state, config.port).await?;

    Ok(())
}

fn init_tracing() -> Result<(), StartupError> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("caching_demo=info".parse()?)
        .add_directive("tiered_cache=info".parse()?)
        .add_directive("file_blob_cache=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    Ok(())
}
