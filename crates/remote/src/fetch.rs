//! HTTP implementation of the [`Fetcher`] capability.

use async_trait::async_trait;
use charsync_core::{Fetcher, SyncError, SyncResult};

/// Fetches remote documents and avatar bytes over a shared
/// [`reqwest::Client`].
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Wrap an existing client so the connection pool is shared with the
    /// uploader.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue a GET and classify the status code.
    async fn get(&self, url: &str) -> SyncResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::Transport(format!("GET {url}: {e}")))?;
        check_status(url, response.status())?;
        Ok(response)
    }
}

/// Map a response status to the error taxonomy.
pub(crate) fn check_status(url: &str, status: reqwest::StatusCode) -> SyncResult<()> {
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(SyncError::NotFound {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(SyncError::Transport(format!(
            "GET {url} returned HTTP {}",
            status.as_u16()
        )));
    }
    Ok(())
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> SyncResult<String> {
        let text = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| SyncError::Transport(format!("GET {url}: reading body: {e}")))?;
        tracing::debug!(url, bytes = text.len(), "Fetched text");
        Ok(text)
    }

    async fn fetch_bytes(&self, url: &str) -> SyncResult<Vec<u8>> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| SyncError::Transport(format!("GET {url}: reading body: {e}")))?;
        tracing::debug!(url, bytes = bytes.len(), "Fetched bytes");
        Ok(bytes.to_vec())
    }
}
