use axum::extract::{Path, State};
use axum::response::Response;

use super::{cached_json, lookup_json};
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Response, AppError> {
    let lookup = state.catalog.users().await?;
    Ok(lookup_json(lookup))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let lookup = state.catalog.user(id).await?;
    match lookup.value {
        Some(user) => Ok(cached_json(user, lookup.source)),
        None => Err(AppError::NotFound(format!("User {} not found", id))),
    }
}

/// GET /api/users/{id}/posts
pub async fn get_user_posts(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let lookup = state.catalog.user_posts(id).await?;
    Ok(lookup_json(lookup))
}
