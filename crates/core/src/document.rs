//! The published JSON document: the projection of a collection that is
//! uploaded, persisted locally, and compared against on the next run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Character, SeriesCollection};
use crate::error::{SyncError, SyncResult};

/// Published view of one character. Field order is part of the format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedCharacter {
    /// Names keyed by locale, values lowercased.
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    /// Avatar short ids, ordered by the original avatar id.
    #[serde(default)]
    pub avatars: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PublishedCharacter {
    pub fn from_character(character: &Character) -> Self {
        Self {
            names: character
                .names()
                .iter()
                .map(|(locale, name)| (locale.clone(), name.to_lowercase()))
                .collect(),
            avatars: character.avatars().values().map(|a| a.short_id()).collect(),
            tags: character.tags().to_vec(),
        }
    }

    pub fn has_avatar(&self, short_id: &str) -> bool {
        self.avatars.iter().any(|a| a == short_id)
    }
}

/// Whole published document, keyed by character id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublishedDocument(pub BTreeMap<String, PublishedCharacter>);

impl PublishedDocument {
    pub fn from_collection(collection: &SeriesCollection) -> Self {
        Self(
            collection
                .characters()
                .iter()
                .map(|(id, c)| (id.clone(), PublishedCharacter::from_character(c)))
                .collect(),
        )
    }

    /// Parse a remotely fetched document.
    pub fn parse(text: &str) -> SyncResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| SyncError::MalformedResponse(format!("published document: {e}")))
    }

    pub fn get(&self, id: &str) -> Option<&PublishedCharacter> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact UTF-8 JSON, the form uploaded to the static store.
    pub fn to_compact_bytes(&self) -> SyncResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| SyncError::Encode(format!("published document: {e}")))
    }

    /// Pretty-printed JSON, the form kept in the local snapshot.
    pub fn to_pretty_string(&self) -> SyncResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SyncError::Encode(format!("published document: {e}")))
    }
}
