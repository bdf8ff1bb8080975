//! Loading the optional remote override document.

use charsync_core::capability::fetch_optional_text;
use charsync_core::overrides::{merge_overrides, OverrideDocument};
use charsync_core::paths::{join_url, override_path};
use charsync_core::{Fetcher, SeriesCollection, SyncResult};

/// Fetch the series' override document and merge it into `collection`.
///
/// A missing or unparsable document means "no overrides" and is only
/// logged. Transport failures propagate. Returns the number of merged
/// characters.
pub async fn load_overrides(
    fetcher: &dyn Fetcher,
    static_url: &str,
    collection: &mut SeriesCollection,
) -> SyncResult<usize> {
    let series = collection.series().to_string();
    let url = join_url(static_url, &override_path(&series));

    let Some(text) = fetch_optional_text(fetcher, &url).await? else {
        tracing::info!(series = %series, url = %url, "No override document");
        return Ok(0);
    };

    let overrides = match OverrideDocument::parse(&text) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(series = %series, url = %url, error = %e, "Ignoring malformed override document");
            return Ok(0);
        }
    };

    let merged = merge_overrides(collection, &overrides);
    tracing::info!(series = %series, merged, "Merged special characters");
    Ok(merged)
}
