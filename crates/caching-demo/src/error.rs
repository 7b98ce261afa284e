use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use file_blob_cache::BlobCacheError;
use jsonplaceholder_client::PlaceholderError;
use serde_json::json;
use std::fmt;
use tiered_cache::TierError;

/// Request error type that converts to HTTP responses
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Upstream(String),
    Decode(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) | AppError::Decode(msg) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<PlaceholderError> for AppError {
    fn from(e: PlaceholderError) -> Self {
        if e.is_upstream() {
            AppError::Upstream(e.to_string())
        } else {
            AppError::Decode(e.to_string())
        }
    }
}

impl From<BlobCacheError> for AppError {
    fn from(e: BlobCacheError) -> Self {
        match e {
            BlobCacheError::NotFound { .. } => AppError::NotFound(e.to_string()),
            BlobCacheError::Io(_) => AppError::Internal(e.to_string()),
        }
    }
}

/// Errors that stop the service from starting
#[derive(Debug)]
pub enum StartupError {
    Config(String),
    RemoteCache(TierError),
    BlobCache(BlobCacheError),
    Io(Box<std::io::Error>),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Config(msg) => write!(f, "Configuration error: {}", msg),
            StartupError::RemoteCache(err) => write!(f, "Remote cache error: {}", err),
            StartupError::BlobCache(err) => write!(f, "Blob cache error: {}", err),
            StartupError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::RemoteCache(err) => Some(err),
            StartupError::BlobCache(err) => Some(err),
            StartupError::Io(err) => Some(err.as_ref()),
            StartupError::Config(_) => None,
        }
    }
}

impl From<TierError> for StartupError {
    fn from(err: TierError) -> Self {
        StartupError::RemoteCache(err)
    }
}

impl From<BlobCacheError> for StartupError {
    fn from(err: BlobCacheError) -> Self {
        StartupError::BlobCache(err)
    }
}

impl From<std::io::Error> for StartupError {
    fn from(err: std::io::Error) -> Self {
        StartupError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for StartupError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        StartupError::Config(err.to_string())
    }
}
