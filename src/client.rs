//! Cat API client
//!
//! Thin typed wrapper over `reqwest` for the three requests the panel makes:
//! metadata lookup, full payload download and streamed copy to disk.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{CatItem, CatMetadata, FetchRequest};
use crate::utils::{metadata_url, resolve_resource_url};
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// HTTP client for the cat API (cloneable - the inner reqwest client is Arc-backed)
#[derive(Clone, Debug)]
pub struct CatApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatApiClient {
    /// Create a client
    ///
    /// When `secure_transport` is false certificate verification is disabled,
    /// which works around broken local trust stores.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &Config, secure_transport: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(!secure_transport)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Base URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request one metadata envelope
    pub async fn fetch_metadata(&self, size_hint: u32, animated: bool) -> Result<CatMetadata> {
        let url = metadata_url(&self.base_url, size_hint, animated)?;
        tracing::debug!(url = %url, "requesting cat metadata");

        let response = self.get(url.as_str()).await?;
        let body = response.bytes().await?;
        let metadata: CatMetadata = serde_json::from_slice(&body)?;
        Ok(metadata)
    }

    /// Download a resource into memory
    pub async fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Stream a resource into a file, creating or truncating it
    ///
    /// Returns the number of bytes written.
    pub async fn download_to_file(&self, url: &str, destination: &Path) -> Result<u64> {
        let response = self.get(url).await?;

        let mut file = tokio::fs::File::create(destination).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(url = %url, destination = %destination.display(), bytes = written, "resource saved");
        Ok(written)
    }

    /// Resolve metadata (filtering animations when asked to) and download the payload
    ///
    /// With `want_animated == false` and `allow_animated == false`, animated
    /// envelopes are discarded and the metadata request is repeated, up to
    /// `max_attempts` requests in total.
    pub async fn fetch_cat(&self, request: FetchRequest) -> Result<CatItem> {
        let filter_animated = !request.want_animated && !request.allow_animated;
        let max_attempts = request.max_attempts.max(1);

        let mut attempts = 0u32;
        let metadata = loop {
            attempts += 1;
            let metadata = self
                .fetch_metadata(request.size_hint, request.want_animated)
                .await?;

            if !(filter_animated && metadata.kind().is_animated()) {
                break metadata;
            }

            tracing::debug!(
                attempt = attempts,
                max_attempts,
                url = %metadata.url,
                "skipping animated cat, GIF support disabled"
            );
            if attempts >= max_attempts {
                return Err(Error::NoStaticCat { attempts });
            }
        };

        let remote_url = resolve_resource_url(&self.base_url, &metadata.url)?.to_string();
        let raw_bytes = self.download_bytes(&remote_url).await?;

        tracing::info!(
            url = %remote_url,
            kind = ?metadata.kind(),
            bytes = raw_bytes.len(),
            attempts,
            "cat fetched"
        );

        Ok(CatItem {
            kind: metadata.kind(),
            suggested_file_name: metadata.suggested_file_name(),
            remote_url,
            raw_bytes,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "cat API returned an error status");
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}
