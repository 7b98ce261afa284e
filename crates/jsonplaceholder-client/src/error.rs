//! Error types for the JSONPlaceholder client

use std::fmt;

/// Errors that can occur when fetching records
#[derive(Debug)]
pub enum PlaceholderError {
    /// The request never produced a response
    Transport(reqwest::Error),
    /// The upstream answered with a non-success status
    Status { url: String, status: u16 },
    /// The body could not be parsed into the expected record shape
    Decode {
        resource: String,
        source: serde_json::Error,
    },
}

impl PlaceholderError {
    /// True for transport failures and non-success statuses
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

impl fmt::Display for PlaceholderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Upstream error: {}", e),
            Self::Status { url, status } => {
                write!(f, "Upstream error: {} returned status {}", url, status)
            }
            Self::Decode { resource, source } => {
                write!(f, "Decode error for {}: {}", resource, source)
            }
        }
    }
}

impl std::error::Error for PlaceholderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Decode { source, .. } => Some(source),
            Self::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for PlaceholderError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

/// Result type for JSONPlaceholder operations
pub type Result<T> = std::result::Result<T, PlaceholderError>;
