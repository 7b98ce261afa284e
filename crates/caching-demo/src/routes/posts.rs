use axum::extract::State;
use axum::response::Response;

use super::lookup_json;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(State(state): State<AppState>) -> Result<Response, AppError> {
    let lookup = state.catalog.posts().await?;
    Ok(lookup_json(lookup))
}
