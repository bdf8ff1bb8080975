//! Capability traits the sync engine consumes.
//!
//! The engine never talks to the network directly: remote documents and
//! avatar bytes come through a [`Fetcher`], published files leave through an
//! [`Uploader`], and game-specific parsing lives behind an [`Adapter`].

use async_trait::async_trait;

use crate::diff::PendingAvatar;
use crate::entity::SeriesCollection;
use crate::error::{SyncError, SyncResult};

/// Read access to remote resources.
///
/// Implementations must map an HTTP 404 to [`SyncError::NotFound`] and any
/// other failure to [`SyncError::Transport`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> SyncResult<String>;

    async fn fetch_bytes(&self, url: &str) -> SyncResult<Vec<u8>>;
}

/// Write access to the remote static store. Uploads are idempotent
/// overwrites.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> SyncResult<()>;
}

/// Per-game parser that knows how to populate a collection.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Series id, e.g. `arknights`.
    fn series(&self) -> &str;

    /// Fetch the source documents and populate `collection`. Any error
    /// aborts the run before anything is published.
    async fn populate(
        &self,
        fetcher: &dyn Fetcher,
        collection: &mut SeriesCollection,
    ) -> SyncResult<()>;

    /// Source URL of an avatar's raw bytes, chosen by the character kind.
    fn avatar_url(&self, avatar: &PendingAvatar) -> SyncResult<String>;
}

/// Fetch a text resource, mapping [`SyncError::NotFound`] to `None`.
pub async fn fetch_optional_text(fetcher: &dyn Fetcher, url: &str) -> SyncResult<Option<String>> {
    match fetcher.fetch_text(url).await {
        Ok(text) => Ok(Some(text)),
        Err(SyncError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
