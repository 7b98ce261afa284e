use chrono::{DateTime, Utc};
use file_blob_cache::ContentBlobCache;
use std::sync::Arc;

use crate::catalog::Catalog;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub avatars: Arc<ContentBlobCache>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(catalog: Catalog, avatars: ContentBlobCache) -> Self {
        Self {
            catalog: Arc::new(catalog),
            avatars: Arc::new(avatars),
            started_at: Utc::now(),
        }
    }
}
