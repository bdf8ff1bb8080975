//! Typed views of the game data tables the adapter reads.
//!
//! Only the fields the adapter needs are modelled; everything else in the
//! tables is ignored.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use charsync_core::{SyncError, SyncResult};

/// Profession of playable-table entries that are traps, not operators.
pub const PROFESSION_TRAP: &str = "NONE";
/// Profession of summoned units.
pub const PROFESSION_TOKEN: &str = "TOKEN";

/// One entry of `character_table.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEntry {
    pub name: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub display_number: Option<String>,
}

impl CharacterEntry {
    /// Tag derived from the profession.
    pub fn role_tag(&self) -> &'static str {
        match self.profession.as_str() {
            PROFESSION_TRAP => "trap",
            PROFESSION_TOKEN => "token",
            _ => "operator",
        }
    }

    /// Display number, treating an empty string like a missing one.
    pub fn code(&self) -> Option<&str> {
        self.display_number.as_deref().filter(|c| !c.is_empty())
    }
}

/// One entry of `enemy_handbook_table.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyEntry {
    pub name: String,
    #[serde(default)]
    pub enemy_index: String,
}

/// One `charSkins` entry of `skin_table.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinEntry {
    pub char_id: String,
    pub avatar_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinTable {
    #[serde(default)]
    pub char_skins: BTreeMap<String, SkinEntry>,
}

pub type CharacterTable = BTreeMap<String, CharacterEntry>;
pub type EnemyTable = BTreeMap<String, EnemyEntry>;

/// Parse a table, naming it in the error.
pub fn parse_table<T: DeserializeOwned>(name: &str, text: &str) -> SyncResult<T> {
    serde_json::from_str(text).map_err(|e| SyncError::MalformedResponse(format!("{name}: {e}")))
}
