//! Avatar upstream

use async_trait::async_trait;
use file_blob_cache::{BlobEntry, BlobSource, SourceError};
use reqwest::Client;
use tracing::{debug, warn};

/// Fetches avatar images keyed by an identity string (usually an email)
pub struct AvatarSource {
    client: Client,
    base_url: String,
}

impl AvatarSource {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn url_for(&self, identity: &str) -> String {
        format!("{}?u={}", self.base_url, urlencoding::encode(identity))
    }
}

#[async_trait]
impl BlobSource for AvatarSource {
    async fn fetch(&self, identity: &str) -> Result<BlobEntry, SourceError> {
        let url = self.url_for(identity);
        debug!(url = %url, "Fetching avatar");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Failed to fetch avatar");
            return Err(format!("avatar service returned status {}", response.status()).into());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response.bytes().await?.to_vec();

        debug!(
            size = bytes.len(),
            content_type = %content_type,
            "Fetched avatar"
        );

        Ok(BlobEntry {
            bytes,
            content_type,
        })
    }
}
