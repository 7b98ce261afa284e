use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/images/avatar/{identity}
/// Serves the avatar from disk, fetching and persisting it on first request.
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Response, AppError> {
    let blob = state.avatars.get_or_fetch(&identity).await?;
    let cache_header = if blob.from_cache { "HIT" } else { "MISS" };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, blob.entry.content_type)
        .header("X-Cache", cache_header)
        .body(Body::from(blob.entry.bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}
