//! Local snapshot of the last published state, read by the serving layer.

use std::path::{Path, PathBuf};

use charsync_core::paths::{snapshot_document_file, snapshot_version_file};
use charsync_core::{PublishedDocument, SyncResult};

/// Writes `data/<series>.json` and `version/<series>.txt` under a root
/// directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist the document (pretty JSON) and the version marker (plain
    /// text), creating the containing directories if needed.
    pub async fn write(
        &self,
        series: &str,
        document: &PublishedDocument,
        fingerprint: &str,
    ) -> SyncResult<()> {
        let document_file = snapshot_document_file(&self.root, series);
        let version_file = snapshot_version_file(&self.root, series);

        write_creating_parent(&document_file, document.to_pretty_string()?.as_bytes()).await?;
        write_creating_parent(&version_file, fingerprint.as_bytes()).await?;

        tracing::info!(
            series,
            document = %document_file.display(),
            version = %version_file.display(),
            "Wrote local snapshot"
        );
        Ok(())
    }
}

async fn write_creating_parent(path: &Path, contents: &[u8]) -> SyncResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}
