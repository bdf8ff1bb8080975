//! Signed uploader for the static-file store.
//!
//! Every request is a multipart `PUT` to the upload endpoint with the target
//! path and site as query parameters. Authentication is a `timestamp`
//! header plus a `signature` header holding
//! `sha256_hex(key + "MTS" + timestamp)`. The store answers with a JSON body
//! whose `code` must be `200`.

use async_trait::async_trait;
use charsync_core::hashing::sha256_hex;
use charsync_core::{SyncError, SyncResult, Uploader};
use serde::Deserialize;

/// Separator the store expects between key and timestamp.
const SIGNATURE_SEPARATOR: &str = "MTS";

/// Application-level success code in the upload response body.
const UPLOAD_OK_CODE: i64 = 200;

/// Connection settings for [`SignedUploader`].
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Upload endpoint URL.
    pub endpoint: String,
    /// Shared signing key.
    pub key: String,
    /// Value of the `site` query parameter.
    pub site: String,
}

/// Body returned by the store.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    code: i64,
}

/// Timestamp and signature headers for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub timestamp: String,
    pub signature: String,
}

/// Sign a request made at `timestamp` (unix seconds).
pub fn sign(key: &str, timestamp: i64) -> Signature {
    let timestamp = timestamp.to_string();
    let signature = sha256_hex(format!("{key}{SIGNATURE_SEPARATOR}{timestamp}").as_bytes());
    Signature {
        timestamp,
        signature,
    }
}

/// [`Uploader`] backed by the signed multipart endpoint.
pub struct SignedUploader {
    client: reqwest::Client,
    config: UploadConfig,
}

impl SignedUploader {
    pub fn new(client: reqwest::Client, config: UploadConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Uploader for SignedUploader {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> SyncResult<()> {
        let Signature {
            timestamp,
            signature,
        } = sign(&self.config.key, chrono::Utc::now().timestamp());

        let size = bytes.len();
        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name("file"));

        let response = self
            .client
            .put(&self.config.endpoint)
            .header("signature", signature)
            .header("timestamp", timestamp)
            .query(&[("path", path), ("site", self.config.site.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| SyncError::Transport(format!("upload {path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Transport(format!(
                "upload {path} failed with HTTP {}",
                status.as_u16()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| SyncError::MalformedResponse(format!("upload {path}: {e}")))?;
        check_code(path, body.code)?;

        tracing::debug!(path, size, "Uploaded file");
        Ok(())
    }
}

fn check_code(path: &str, code: i64) -> SyncResult<()> {
    if code != UPLOAD_OK_CODE {
        return Err(SyncError::Transport(format!(
            "upload {path} failed [{code}]"
        )));
    }
    Ok(())
}
