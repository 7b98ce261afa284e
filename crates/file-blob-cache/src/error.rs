//! Error types for the blob cache

use std::fmt;

#[derive(Debug)]
pub enum BlobCacheError {
    /// Nothing cached and the upstream fetch did not succeed
    NotFound { identity: String, reason: String },
    /// A cached file exists but could not be read
    Io(Box<std::io::Error>),
}

impl fmt::Display for BlobCacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobCacheError::NotFound { identity, reason } => {
                write!(f, "Blob not found for {}: {}", identity, reason)
            }
            BlobCacheError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for BlobCacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlobCacheError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BlobCacheError {
    fn from(err: std::io::Error) -> Self {
        BlobCacheError::Io(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BlobCacheError>;
