//! Upstream doubles shared by the unit tests

use crate::catalog::Catalog;
use crate::state::AppState;
use async_trait::async_trait;
use file_blob_cache::{BlobEntry, BlobSource, ContentBlobCache, SourceError};
use jsonplaceholder_client::{PlaceholderError, RecordFetcher, Resource};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tiered_cache::{CacheAside, LocalCache, MemoryRemoteCache, TtlPolicy};

enum StubResponse {
    Body(String),
    Status(u16),
}

#[derive(Default)]
struct StubState {
    responses: Mutex<HashMap<String, StubResponse>>,
    calls: Mutex<HashMap<String, usize>>,
}

/// Record upstream answering from a fixed table keyed by resource path
#[derive(Clone, Default)]
pub struct StubFetcher {
    state: Arc<StubState>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, path: &str, body: &str) -> Self {
        self.respond(path, StubResponse::Body(body.to_string()))
    }

    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.respond(path, StubResponse::Status(status))
    }

    pub fn calls(&self, path: &str) -> usize {
        let calls = self.state.calls.lock().unwrap();
        calls.get(path).copied().unwrap_or(0)
    }

    fn respond(self, path: &str, response: StubResponse) -> Self {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(path.to_string(), response);
        self
    }
}

#[async_trait]
impl RecordFetcher for StubFetcher {
    async fn fetch_body(&self, resource: &Resource) -> jsonplaceholder_client::Result<String> {
        let path = resource.path();
        *self
            .state
            .calls
            .lock()
            .unwrap()
            .entry(path.clone())
            .or_insert(0) += 1;

        let responses = self.state.responses.lock().unwrap();
        match responses.get(&path) {
            Some(StubResponse::Body(body)) => Ok(body.clone()),
            Some(StubResponse::Status(status)) => Err(PlaceholderError::Status {
                url: path,
                status: *status,
            }),
            None => Err(PlaceholderError::Status {
                url: path,
                status: 404,
            }),
        }
    }
}

/// Avatar upstream serving the same bytes for every identity
pub struct StubAvatars {
    pub bytes: Vec<u8>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubAvatars {
    pub fn serving(bytes: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            bytes: bytes.to_vec(),
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            bytes: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobSource for StubAvatars {
    async fn fetch(&self, _identity: &str) -> Result<BlobEntry, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("avatar service returned status 404".into());
        }
        Ok(BlobEntry {
            bytes: self.bytes.clone(),
            content_type: "image/jpeg".to_string(),
        })
    }
}

pub fn catalog_with(fetcher: StubFetcher, remote: Arc<MemoryRemoteCache>) -> Catalog {
    let cache = CacheAside::new(LocalCache::default(), remote, TtlPolicy::default());
    Catalog::new(cache, Arc::new(fetcher))
}

pub fn state_with(
    fetcher: StubFetcher,
    remote: Arc<MemoryRemoteCache>,
    avatars: Arc<StubAvatars>,
    avatar_dir: PathBuf,
) -> AppState {
    let catalog = catalog_with(fetcher, remote);
    let avatars = ContentBlobCache::new(avatar_dir, avatars);
    AppState::new(catalog, avatars)
}
