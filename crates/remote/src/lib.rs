//! Network implementations of the fetch and upload capabilities.
//!
//! Both share one [`reqwest::Client`] built by [`build_client`], so a run
//! holds a single connection pool that is released when the client and its
//! clones are dropped.

use std::time::Duration;

use charsync_core::{SyncError, SyncResult};

pub mod fetch;
pub mod upload;

pub use fetch::HttpFetcher;
pub use upload::{SignedUploader, UploadConfig};

/// Build the shared HTTP client with a per-request timeout.
pub fn build_client(request_timeout: Duration) -> SyncResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .build()
        .map_err(|e| SyncError::Transport(format!("building HTTP client: {e}")))
}
