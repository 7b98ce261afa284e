//! Disk-backed blob cache

use crate::error::{BlobCacheError, Result};
use crate::key::filename_for;
use crate::source::BlobSource;
use crate::types::{Blob, BlobEntry, CacheStats};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Content type reported for blobs served from disk
pub const CACHED_CONTENT_TYPE: &str = "image/webp";

/// Subdirectory of the cache directory holding in-flight writes
pub const TMP_DIR: &str = ".tmp";

fn temp_name(seq: u64) -> String {
    format!("{}-{}.part", std::process::id(), seq)
}

/// A blob cache that owns one directory and never expires entries
pub struct ContentBlobCache {
    /// Directory where cached blobs are stored
    cache_dir: PathBuf,
    source: Arc<dyn BlobSource>,
    hits: AtomicU64,
    misses: AtomicU64,
    write_failures: AtomicU64,
    /// Suffix for temporary files so concurrent writers never share one
    write_seq: AtomicU64,
}

impl ContentBlobCache {
    pub fn new(cache_dir: PathBuf, source: Arc<dyn BlobSource>) -> Self {
        Self {
            cache_dir,
            source,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            write_seq: AtomicU64::new(0),
        }
    }

    /// Ensure the cache directory exists
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).await?;
        info!(cache_dir = ?self.cache_dir, "Blob cache initialized");
        Ok(())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path a blob for `identity` is stored at
    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.cache_dir.join(filename_for(identity))
    }

    /// Serve `identity` from disk, or fetch it from the source and persist it.
    ///
    /// A failed write is reported in [`Blob::persist_error`]; the fetched
    /// bytes are still returned.
    pub async fn get_or_fetch(&self, identity: &str) -> Result<Blob> {
        let path = self.path_for(identity);

        match fs::read(&path).await {
            Ok(bytes) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(identity, size = bytes.len(), "Blob cache hit");
                return Ok(Blob {
                    entry: BlobEntry {
                        bytes,
                        content_type: CACHED_CONTENT_TYPE.to_string(),
                    },
                    from_cache: true,
                    persist_error: None,
                });
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                warn!(identity, path = ?path, error = %e, "Cached blob is not readable");
                return Err(e.into());
            }
            // Includes names past the filesystem limit; the source can still serve them
            Err(e) => {
                warn!(identity, path = ?path, error = %e, "Failed to read cached blob, fetching");
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(identity, "Blob cache miss");

        let entry = self.source.fetch(identity).await.map_err(|e| {
            warn!(identity, error = %e, "Failed to fetch blob");
            BlobCacheError::NotFound {
                identity: identity.to_string(),
                reason: e.to_string(),
            }
        })?;

        let persist_error = match self.persist(&path, &entry.bytes).await {
            Ok(()) => {
                debug!(identity, path = ?path, size = entry.bytes.len(), "Cached blob");
                None
            }
            Err(e) => {
                self.write_failures.fetch_add(1, Ordering::Relaxed);
                warn!(identity, path = ?path, error = %e, "Failed to cache blob");
                Some(e)
            }
        };

        Ok(Blob {
            entry,
            from_cache: false,
            persist_error,
        })
    }

    /// Write to a temporary file, then rename, so readers never see a partial blob.
    ///
    /// Temporary files live in [`TMP_DIR`] under short names, so any blob name
    /// that fits the filesystem can be persisted.
    async fn persist(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let tmp_dir = self.cache_dir.join(TMP_DIR);
        fs::create_dir_all(&tmp_dir).await?;

        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = tmp_dir.join(temp_name(seq));

        fs::write(&tmp, bytes).await?;
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}
