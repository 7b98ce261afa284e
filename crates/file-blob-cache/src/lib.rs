//! Content-addressed file cache for binary blobs
//!
//! Blobs are named by a reversible encoding of an identity string and kept
//! forever once written. Deleting a file invalidates it; the next request
//! fetches it again from the [`BlobSource`].

mod cache;
mod error;
mod key;
mod source;
mod types;

pub use cache::{ContentBlobCache, CACHED_CONTENT_TYPE, TMP_DIR};
pub use error::{BlobCacheError, Result};
pub use key::{filename_for, identity_from_filename, BLOB_EXTENSION};
pub use source::{BlobSource, SourceError};
pub use types::{Blob, BlobEntry, CacheStats};
