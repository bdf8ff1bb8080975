//! `charsync-worker` -- publishes the Arknights character resources.
//!
//! Loads [`SyncConfig`] from the environment (and `.env`), runs one update
//! of the `arknights` series and exits non-zero if it failed.

use charsync_arknights::ArknightsAdapter;
use charsync_pipeline::UpdateOutcome;
use charsync_worker::config::SyncConfig;
use charsync_worker::run::run_series;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "charsync_worker=info,charsync_pipeline=info,charsync_remote=info,charsync_arknights=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SyncConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let adapter = ArknightsAdapter::new();
    match run_series(&config, &adapter).await {
        Ok(UpdateOutcome::Unchanged { fingerprint }) => {
            tracing::info!(fingerprint = %fingerprint, "Nothing to publish");
        }
        Ok(UpdateOutcome::Published(summary)) => {
            tracing::info!(
                fingerprint = %summary.fingerprint,
                uploaded = summary.uploaded,
                evicted = summary.evicted.len(),
                pruned = summary.pruned.len(),
                "Sync finished"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Sync failed");
            std::process::exit(1);
        }
    }
}
