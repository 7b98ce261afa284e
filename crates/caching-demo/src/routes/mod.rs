pub mod health;
pub mod images;
pub mod posts;
pub mod users;

use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tiered_cache::{Lookup, Tier};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::state::AppState;

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/users", get(users::list_users))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/users/{id}/posts", get(users::get_user_posts))
        .route("/api/posts", get(posts::list_posts))
        .route("/api/images/avatar/{identity}", get(images::get_avatar))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: AppState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// JSON body plus an `X-Cache` header naming the tier that answered
fn cached_json<T: Serialize>(value: T, source: Tier) -> Response {
    let tier = match source {
        Tier::Local => "LOCAL",
        Tier::Remote => "REMOTE",
        Tier::Upstream => "MISS",
    };
    ([("X-Cache", tier)], Json(value)).into_response()
}

fn lookup_json<T: Serialize>(lookup: Lookup<T>) -> Response {
    cached_json(lookup.value, lookup.source)
}
