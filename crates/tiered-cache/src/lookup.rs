//! Read results

use crate::error::TierError;
use std::fmt;

/// The tier that answered a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Local,
    Remote,
    Upstream,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Local => "local",
            Tier::Remote => "remote",
            Tier::Upstream => "upstream",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal cache-tier failure encountered while serving a read
#[derive(Debug)]
pub enum TierFailure {
    /// The remote tier could not be probed; the read fell through to upstream
    RemoteProbe(TierError),
    /// The upstream body could not be written back to the remote tier
    RemoteWrite(TierError),
}

impl fmt::Display for TierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierFailure::RemoteProbe(err) => write!(f, "remote probe failed: {}", err),
            TierFailure::RemoteWrite(err) => write!(f, "remote write failed: {}", err),
        }
    }
}

/// A value obtained from some tier, plus any cache-tier failures along the way
#[derive(Debug)]
pub struct Lookup<T> {
    pub value: T,
    pub source: Tier,
    pub failures: Vec<TierFailure>,
}

impl<T> Lookup<T> {
    pub fn new(value: T, source: Tier) -> Self {
        Self {
            value,
            source,
            failures: Vec::new(),
        }
    }

    /// True when the value was obtained but at least one tier misbehaved
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        Lookup {
            value: f(self.value),
            source: self.source,
            failures: self.failures,
        }
    }
}
