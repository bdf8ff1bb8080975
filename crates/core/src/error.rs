/// Error taxonomy shared by every stage of a series update.
///
/// Only [`SyncError::NotFound`] is ever recovered from, and only at the call
/// sites that explicitly tolerate it (avatar eviction, optional remote
/// documents). Everything else aborts the current run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Whether this error means the remote resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type SyncResult<T> = Result<T, SyncError>;
