//! JSONPlaceholder HTTP client

use crate::error::{PlaceholderError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// An upstream resource addressable by path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Posts,
    User(u64),
    UserPosts(u64),
}

impl Resource {
    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Resource::Users => "users".to_string(),
            Resource::Posts => "posts".to_string(),
            Resource::User(id) => format!("users/{}", id),
            Resource::UserPosts(id) => format!("users/{}/posts", id),
        }
    }
}

/// Fetches raw record bodies from an upstream
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetch the response body for `resource`, failing on transport errors
    /// and non-success statuses
    async fn fetch_body(&self, resource: &Resource) -> Result<String>;
}

/// A fetched body together with its decoded records
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub body: String,
    /// `None` when the body was empty or JSON `null`
    pub records: Option<T>,
}

impl<T: DeserializeOwned> Fetched<T> {
    pub fn decode(resource: &Resource, body: String) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self {
                body,
                records: None,
            });
        }

        let records = serde_json::from_str::<Option<T>>(&body).map_err(|source| {
            PlaceholderError::Decode {
                resource: resource.path(),
                source,
            }
        })?;

        Ok(Self { body, records })
    }
}

impl<T> Fetched<T> {
    pub fn into_parts(self) -> (String, Option<T>) {
        (self.body, self.records)
    }
}

/// Fetch `resource` and decode it as `T`
pub async fn fetch_records<T: DeserializeOwned>(
    fetcher: &dyn RecordFetcher,
    resource: &Resource,
) -> Result<Fetched<T>> {
    let body = fetcher.fetch_body(resource).await?;
    Fetched::decode(resource, body)
}

/// HTTP client for the JSONPlaceholder API
pub struct PlaceholderClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlaceholderClient {
    /// Create a client against the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, resource: &Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }
}

impl Default for PlaceholderClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordFetcher for PlaceholderClient {
    async fn fetch_body(&self, resource: &Resource) -> Result<String> {
        let url = self.url_for(resource);
        debug!(url = %url, "Fetching from upstream");

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Upstream returned an error status");
            return Err(PlaceholderError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(url = %url, size = body.len(), "Fetched from upstream");
        Ok(body)
    }
}
