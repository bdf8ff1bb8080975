//! The per-series update state machine.
//!
//! ```text
//! Start -> Pruned -> FingerprintComputed -> Unchanged
//!                                        -> DiffComputed -> Uploading -> Repruned
//!                                           -> FingerprintRecomputed -> Published
//! ```
//!
//! A fatal error anywhere ends in `Failed`. Avatar files already uploaded at
//! that point stay in place; they are idempotent overwrites, so the next run
//! simply starts over. The version marker and document are only uploaded
//! after every avatar outcome is known.

use charsync_core::capability::fetch_optional_text;
use charsync_core::diff::{pending_avatars, PendingAvatar};
use charsync_core::paths::{document_path, join_url, version_path};
use charsync_core::{
    compute_fingerprint, Adapter, Fetcher, FingerprintAlgorithm, PublishedDocument,
    SeriesCollection, SyncError, SyncResult, Uploader,
};
use futures::{StreamExt, TryStreamExt};

use crate::encoder::AvatarEncoder;
use crate::overrides::load_overrides;
use crate::snapshot::SnapshotStore;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// States of one `update()` invocation, reported in the `phase` log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Pruned,
    FingerprintComputed,
    Unchanged,
    DiffComputed,
    Uploading,
    Repruned,
    FingerprintRecomputed,
    Published,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pruned => "pruned",
            Self::FingerprintComputed => "fingerprint_computed",
            Self::Unchanged => "unchanged",
            Self::DiffComputed => "diff_computed",
            Self::Uploading => "uploading",
            Self::Repruned => "repruned",
            Self::FingerprintRecomputed => "fingerprint_recomputed",
            Self::Published => "published",
            Self::Failed => "failed",
        }
    }

    /// Terminal states end the invocation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Unchanged | Self::Published | Self::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Options & outcome
// ---------------------------------------------------------------------------

/// Tunables of a pipeline run.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Unauthenticated root of the published static files.
    pub static_url: String,
    pub algorithm: FingerprintAlgorithm,
    /// Number of avatars processed concurrently (at least 1).
    pub upload_concurrency: usize,
}

/// What a finished update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Local and remote fingerprints matched; nothing was uploaded.
    Unchanged { fingerprint: String },
    Published(PublishSummary),
}

/// Details of a publishing update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSummary {
    pub fingerprint: String,
    /// Remote fingerprint before the update, if one was published.
    pub previous: Option<String>,
    /// Avatars whose files were uploaded.
    pub uploaded: usize,
    /// `(character_id, avatar_id)` pairs dropped because the source was gone.
    pub evicted: Vec<(String, String)>,
    /// Characters removed by the prune after eviction.
    pub pruned: Vec<String>,
}

/// Result of publishing one avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AvatarOutcome {
    Uploaded,
    Missing,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Borrowed dependencies of a run. Whoever builds the pipeline owns the
/// HTTP client and releases it once the run returns.
pub struct Pipeline<'a> {
    fetcher: &'a dyn Fetcher,
    uploader: &'a dyn Uploader,
    encoder: &'a dyn AvatarEncoder,
    snapshot: &'a SnapshotStore,
    options: UpdateOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        uploader: &'a dyn Uploader,
        encoder: &'a dyn AvatarEncoder,
        snapshot: &'a SnapshotStore,
        options: UpdateOptions,
    ) -> Self {
        Self {
            fetcher,
            uploader,
            encoder,
            snapshot,
            options,
        }
    }

    /// Populate a fresh collection through `adapter`, merge overrides and
    /// run [`update`](Self::update).
    pub async fn run_series(&self, adapter: &dyn Adapter) -> SyncResult<UpdateOutcome> {
        let series = adapter.series();
        let mut collection = SeriesCollection::new(series);

        tracing::info!(series, "Fetching source data");
        adapter.populate(self.fetcher, &mut collection).await?;
        tracing::info!(series, characters = collection.len(), "Source data parsed");

        load_overrides(self.fetcher, &self.options.static_url, &mut collection).await?;

        self.update(&mut collection, adapter).await
    }

    /// Publish `collection` if its fingerprint differs from the remote one.
    pub async fn update(
        &self,
        collection: &mut SeriesCollection,
        adapter: &dyn Adapter,
    ) -> SyncResult<UpdateOutcome> {
        let result = self.try_update(collection, adapter).await;
        if let Err(e) = &result {
            tracing::error!(
                series = collection.series(),
                phase = %Phase::Failed,
                error = %e,
                "Update failed"
            );
        }
        result
    }

    async fn try_update(
        &self,
        collection: &mut SeriesCollection,
        adapter: &dyn Adapter,
    ) -> SyncResult<UpdateOutcome> {
        let series = collection.series().to_string();
        let algorithm = self.options.algorithm;
        tracing::debug!(series = %series, phase = %Phase::Start, "Update started");

        log_pruned(&series, &collection.clean());
        tracing::debug!(
            series = %series,
            phase = %Phase::Pruned,
            characters = collection.len(),
            "Collection pruned"
        );

        let fingerprint = compute_fingerprint(collection, algorithm);
        tracing::debug!(
            series = %series,
            phase = %Phase::FingerprintComputed,
            fingerprint = %fingerprint,
            %algorithm,
            "Fingerprint computed"
        );

        let previous = self.remote_fingerprint(&series).await?;
        if previous.as_deref() == Some(fingerprint.as_str()) {
            tracing::info!(
                series = %series,
                phase = %Phase::Unchanged,
                fingerprint = %fingerprint,
                "Pass, remote is up to date"
            );
            return Ok(UpdateOutcome::Unchanged { fingerprint });
        }
        tracing::info!(
            series = %series,
            fingerprint = %fingerprint,
            previous = previous.as_deref().unwrap_or("<none>"),
            "Update required"
        );

        let remote = self.remote_document(&series).await?;
        let pending = pending_avatars(collection, &remote);
        tracing::info!(
            series = %series,
            phase = %Phase::DiffComputed,
            remote_characters = remote.len(),
            pending = pending.len(),
            "Avatar diff computed"
        );

        let jobs = pending
            .into_iter()
            .map(|avatar| adapter.avatar_url(&avatar).map(|url| (avatar, url)))
            .collect::<SyncResult<Vec<_>>>()?;

        tracing::debug!(
            series = %series,
            phase = %Phase::Uploading,
            jobs = jobs.len(),
            "Uploading avatars"
        );
        let outcomes: Vec<(PendingAvatar, AvatarOutcome)> = futures::stream::iter(jobs)
            .map(move |(avatar, url)| async move {
                let outcome = self.publish_avatar(&avatar, &url).await?;
                Ok::<_, SyncError>((avatar, outcome))
            })
            .buffer_unordered(self.options.upload_concurrency.max(1))
            .try_collect()
            .await?;

        let mut uploaded = 0;
        let mut evicted = Vec::new();
        for (avatar, outcome) in outcomes {
            match outcome {
                AvatarOutcome::Uploaded => uploaded += 1,
                AvatarOutcome::Missing => {
                    if let Some(character) = collection.get_mut(&avatar.character_id) {
                        character.evict_avatar(&avatar.avatar_id);
                    }
                    evicted.push((avatar.character_id, avatar.avatar_id));
                }
            }
        }
        evicted.sort();

        let pruned = collection.clean();
        log_pruned(&series, &pruned);
        tracing::debug!(
            series = %series,
            phase = %Phase::Repruned,
            uploaded,
            evicted = evicted.len(),
            "Avatar uploads finished"
        );

        let fingerprint = compute_fingerprint(collection, algorithm);
        tracing::debug!(
            series = %series,
            phase = %Phase::FingerprintRecomputed,
            fingerprint = %fingerprint,
            "Fingerprint recomputed"
        );
        if previous.as_deref() == Some(fingerprint.as_str()) {
            // Publishing is redundant here but still correct.
            tracing::warn!(
                series = %series,
                fingerprint = %fingerprint,
                "Update failed (same pass): fingerprint after upload equals the published one"
            );
        }

        let document = PublishedDocument::from_collection(collection);

        self.uploader
            .put(&version_path(&series), fingerprint.clone().into_bytes())
            .await?;
        tracing::info!(series = %series, fingerprint = %fingerprint, "Uploaded version");

        self.uploader
            .put(&document_path(&series), document.to_compact_bytes()?)
            .await?;
        tracing::info!(series = %series, characters = document.len(), "Uploaded data");

        self.snapshot.write(&series, &document, &fingerprint).await?;

        tracing::info!(
            series = %series,
            phase = %Phase::Published,
            fingerprint = %fingerprint,
            uploaded,
            evicted = evicted.len(),
            pruned = pruned.len(),
            "Update published"
        );

        Ok(UpdateOutcome::Published(PublishSummary {
            fingerprint,
            previous,
            uploaded,
            evicted,
            pruned,
        }))
    }

    /// Currently published version marker, `None` if there is none.
    async fn remote_fingerprint(&self, series: &str) -> SyncResult<Option<String>> {
        let url = join_url(&self.options.static_url, &version_path(series));
        let version = fetch_optional_text(self.fetcher, &url).await?;
        Ok(version.map(|v| v.trim().to_string()))
    }

    /// Currently published document, empty if there is none.
    async fn remote_document(&self, series: &str) -> SyncResult<PublishedDocument> {
        let url = join_url(&self.options.static_url, &document_path(series));
        match fetch_optional_text(self.fetcher, &url).await? {
            Some(text) => PublishedDocument::parse(&text),
            None => Ok(PublishedDocument::default()),
        }
    }

    /// Fetch, encode and upload every rendition of one avatar.
    ///
    /// A missing source is reported as [`AvatarOutcome::Missing`] so the
    /// caller can evict it; everything else is fatal.
    async fn publish_avatar(&self, avatar: &PendingAvatar, url: &str) -> SyncResult<AvatarOutcome> {
        let raw = match self.fetcher.fetch_bytes(url).await {
            Ok(raw) => raw,
            Err(SyncError::NotFound { .. }) => {
                tracing::warn!(
                    character = %avatar.character_id,
                    avatar = %avatar.avatar_id,
                    url,
                    "Avatar source not found, evicting"
                );
                return Ok(AvatarOutcome::Missing);
            }
            Err(e) => return Err(e),
        };

        for rendition in self.encoder.encode(&raw)? {
            let path = format!("{}.{}", avatar.raw_path, rendition.extension);
            self.uploader.put(&path, rendition.bytes).await?;
            tracing::info!(path = %path, kind = %avatar.kind, "Uploaded avatar file");
        }
        Ok(AvatarOutcome::Uploaded)
    }
}

fn log_pruned(series: &str, pruned: &[String]) {
    for id in pruned {
        tracing::warn!(series, character = %id, "Pruned invalid character");
    }
}
