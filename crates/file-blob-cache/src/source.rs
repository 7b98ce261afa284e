//! Upstream for cache misses

use crate::types::BlobEntry;
use async_trait::async_trait;

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Fetches a blob by identity when it is not on disk
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Returns the bytes and the content type the upstream reported
    async fn fetch(&self, identity: &str) -> Result<BlobEntry, SourceError>;
}
