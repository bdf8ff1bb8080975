//! Wiring of one sync run.

use charsync_core::{Adapter, SyncResult};
use charsync_pipeline::{Pipeline, SnapshotStore, UpdateOptions, UpdateOutcome, WebpEncoder};
use charsync_remote::{build_client, HttpFetcher, SignedUploader};

use crate::config::SyncConfig;

/// Build the network stack from `config`, run `adapter`'s series through
/// the pipeline and release the connection pool.
pub async fn run_series(config: &SyncConfig, adapter: &dyn Adapter) -> SyncResult<UpdateOutcome> {
    let client = build_client(config.request_timeout())?;
    let fetcher = HttpFetcher::new(client.clone());
    let uploader = SignedUploader::new(client, config.upload.clone());
    let encoder = WebpEncoder;
    let snapshot = SnapshotStore::new(&config.snapshot_dir);

    let options = UpdateOptions {
        static_url: config.static_url.clone(),
        algorithm: config.algorithm,
        upload_concurrency: config.upload_concurrency,
    };
    let pipeline = Pipeline::new(&fetcher, &uploader, &encoder, &snapshot, options);

    tracing::info!(
        series = adapter.series(),
        static_url = %config.static_url,
        snapshot_dir = %config.snapshot_dir.display(),
        algorithm = %config.algorithm,
        upload_concurrency = config.upload_concurrency,
        "Starting sync"
    );
    pipeline.run_series(adapter).await
}
