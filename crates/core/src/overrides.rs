//! Manual override document and its merge into a collection.
//!
//! The document maps character ids to `{names, avatars, tags?}` where
//! `avatars` is a list of fully qualified URLs. Merged characters become
//! special: their names and avatars are taken verbatim and they are never
//! diffed or uploaded by the pipeline.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::entity::SeriesCollection;
use crate::error::{SyncError, SyncResult};

/// One override entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OverrideEntry {
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub avatars: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Parsed override document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct OverrideDocument(pub BTreeMap<String, OverrideEntry>);

impl OverrideDocument {
    pub fn parse(text: &str) -> SyncResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| SyncError::MalformedResponse(format!("override document: {e}")))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Merge every override entry into `collection`. Returns the number of
/// characters merged.
pub fn merge_overrides(collection: &mut SeriesCollection, overrides: &OverrideDocument) -> usize {
    for (id, entry) in &overrides.0 {
        let character = collection.get_or_create(id, true);
        character.replace_names(entry.names.clone());
        character.replace_external_avatars(&entry.avatars);
        for tag in &entry.tags {
            character.add_tag(tag);
        }
    }
    overrides.len()
}
