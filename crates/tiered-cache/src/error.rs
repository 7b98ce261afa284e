//! Error types for cache tiers

use std::fmt;

/// Errors raised by a cache tier
#[derive(Debug)]
pub enum TierError {
    /// The shared store could not be reached or rejected the command
    StoreUnavailable(String),
}

impl fmt::Display for TierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierError::StoreUnavailable(msg) => write!(f, "Remote cache unavailable: {}", msg),
        }
    }
}

impl std::error::Error for TierError {}

impl From<redis::RedisError> for TierError {
    fn from(err: redis::RedisError) -> Self {
        TierError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TierError>;
