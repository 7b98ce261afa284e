//! Two-tier read-through cache
//!
//! A fast in-process tier ([`LocalCache`], backed by moka) sits in front of a
//! shared text tier ([`RemoteCache`], backed by Redis). [`CacheAside`]
//! composes both in front of an arbitrary upstream fetch.

mod cache_aside;
mod error;
mod local;
mod lookup;
mod remote;

pub use cache_aside::{CacheAside, TtlPolicy, DEFAULT_LOCAL_TTL, DEFAULT_REMOTE_TTL};
pub use error::{Result, TierError};
pub use local::LocalCache;
pub use lookup::{Lookup, Tier, TierFailure};
pub use remote::{MemoryRemoteCache, RedisCache, RemoteCache};
