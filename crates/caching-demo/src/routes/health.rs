use axum::extract::State;
use axum::response::Json;
use chrono::Utc;
use file_blob_cache::CacheStats;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub remote_cache: &'static str,
    pub avatar_cache: CacheStats,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let remote_ok = state.catalog.remote_reachable().await;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: if remote_ok { "ok" } else { "degraded" },
        uptime_secs,
        remote_cache: if remote_ok { "ok" } else { "unavailable" },
        avatar_cache: state.avatars.stats(),
    })
}
