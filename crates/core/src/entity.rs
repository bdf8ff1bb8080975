//! Canonical entity model: [`Avatar`], [`Character`] and [`SeriesCollection`].
//!
//! Adapters populate a collection through the get-or-create / add-* API,
//! the override merge rewrites special entries, and [`SeriesCollection::clean`]
//! prunes invalid characters. None of the mutating operations can fail.

use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Avatar
// ---------------------------------------------------------------------------

/// Prefix used for short ids of avatars that do not start with their
/// character id.
const SHORT_ID_FALLBACK_PREFIX: &str = "id:";

/// Where an avatar's published file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarLocation {
    /// Uploaded by the pipeline under `avatar/{series}/{avatar_id}`.
    Derived,
    /// Hosted elsewhere; the override document supplied the full URL.
    External(String),
}

/// A single avatar image belonging to one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    character_id: String,
    series: String,
    avatar_id: String,
    location: AvatarLocation,
}

impl Avatar {
    /// Build a derived avatar from its identity triple.
    pub fn new(character_id: &str, series: &str, avatar_id: &str) -> Self {
        Self {
            character_id: character_id.to_string(),
            series: series.to_string(),
            avatar_id: avatar_id.to_string(),
            location: AvatarLocation::Derived,
        }
    }

    /// Build an avatar whose file is hosted at a fixed external URL.
    pub fn external(character_id: &str, series: &str, avatar_id: &str, url: &str) -> Self {
        Self {
            character_id: character_id.to_string(),
            series: series.to_string(),
            avatar_id: avatar_id.to_string(),
            location: AvatarLocation::External(url.to_string()),
        }
    }

    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn avatar_id(&self) -> &str {
        &self.avatar_id
    }

    pub fn location(&self) -> &AvatarLocation {
        &self.location
    }

    /// `true` for avatars the pipeline is responsible for uploading.
    pub fn is_derived(&self) -> bool {
        self.location == AvatarLocation::Derived
    }

    /// Remote path without extension, or the literal URL for external avatars.
    pub fn raw_path(&self) -> String {
        match &self.location {
            AvatarLocation::Derived => format!("avatar/{}/{}", self.series, self.avatar_id),
            AvatarLocation::External(url) => url.clone(),
        }
    }

    /// Stable key used in the published document.
    ///
    /// Derived avatars strip the owning character id from the front of the
    /// avatar id (`char_002_amiya#2` -> `#2`); ids without that prefix get
    /// an `id:` marker so the two shapes never collide. External avatars are
    /// published by URL.
    pub fn short_id(&self) -> String {
        match &self.location {
            AvatarLocation::External(url) => url.clone(),
            AvatarLocation::Derived => match self.avatar_id.strip_prefix(&self.character_id) {
                Some(rest) => rest.to_string(),
                None => format!("{SHORT_ID_FALLBACK_PREFIX}{}", self.avatar_id),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// Playable vs non-playable discriminant. Adapters set it explicitly; the
/// pipeline uses it to pick the avatar endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterKind {
    #[default]
    Playable,
    NonPlayable,
}

impl CharacterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playable => "playable",
            Self::NonPlayable => "non_playable",
        }
    }
}

impl std::fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One character (or enemy) of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    id: String,
    series: String,
    names: BTreeMap<String, String>,
    avatars: BTreeMap<String, Avatar>,
    types: BTreeSet<String>,
    tags: Vec<String>,
    special: bool,
    kind: CharacterKind,
}

impl Character {
    pub fn new(id: &str, series: &str) -> Self {
        Self {
            id: id.to_string(),
            series: series.to_string(),
            names: BTreeMap::new(),
            avatars: BTreeMap::new(),
            types: BTreeSet::new(),
            tags: Vec::new(),
            special: false,
            kind: CharacterKind::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    pub fn avatars(&self) -> &BTreeMap<String, Avatar> {
        &self.avatars
    }

    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_special(&self) -> bool {
        self.special
    }

    pub fn kind(&self) -> CharacterKind {
        self.kind
    }

    /// Set a name for a locale (or synthetic kind such as `py`). Last write wins.
    pub fn add_name(&mut self, locale: &str, name: &str) {
        self.names.insert(locale.to_string(), name.to_string());
    }

    /// Add a derived avatar, replacing any avatar with the same id.
    pub fn add_avatar(&mut self, avatar_id: &str) {
        let avatar = Avatar::new(&self.id, &self.series, avatar_id);
        self.avatars.insert(avatar_id.to_string(), avatar);
    }

    pub fn add_type(&mut self, kind: &str) {
        self.types.insert(kind.to_string());
    }

    /// Append a tag unless it is already present.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn set_kind(&mut self, kind: CharacterKind) {
        self.kind = kind;
    }

    pub(crate) fn mark_special(&mut self) {
        self.special = true;
    }

    /// Replace the whole names map.
    pub(crate) fn replace_names(&mut self, names: BTreeMap<String, String>) {
        self.names = names;
    }

    /// Replace the avatar set with externally hosted avatars, one per URL,
    /// keyed by position and URL so a changed URL changes the fingerprint.
    pub(crate) fn replace_external_avatars(&mut self, urls: &[String]) {
        self.avatars.clear();
        for (index, url) in urls.iter().enumerate() {
            let avatar_id = format!("override-{index:03}:{url}");
            let avatar = Avatar::external(&self.id, &self.series, &avatar_id, url);
            self.avatars.insert(avatar_id, avatar);
        }
    }

    /// Remove one avatar. Returns `true` if it was present.
    pub fn evict_avatar(&mut self, avatar_id: &str) -> bool {
        self.avatars.remove(avatar_id).is_some()
    }

    /// A character without names or without avatars cannot be published.
    pub fn is_invalid(&self) -> bool {
        self.names.is_empty() || self.avatars.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SeriesCollection
// ---------------------------------------------------------------------------

/// All characters of one series, keyed (and therefore iterated) by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCollection {
    series: String,
    characters: BTreeMap<String, Character>,
}

impl SeriesCollection {
    pub fn new(series: &str) -> Self {
        Self {
            series: series.to_string(),
            characters: BTreeMap::new(),
        }
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn characters(&self) -> &BTreeMap<String, Character> {
        &self.characters
    }

    pub fn get(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Character> {
        self.characters.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Look up a character, inserting an empty one on first reference.
    ///
    /// Passing `special = true` marks the character special whether or not
    /// it already existed; `false` never clears the flag.
    pub fn get_or_create(&mut self, id: &str, special: bool) -> &mut Character {
        let series = &self.series;
        let character = self
            .characters
            .entry(id.to_string())
            .or_insert_with(|| Character::new(id, series));
        if special {
            character.mark_special();
        }
        character
    }

    /// Remove every invalid character and return the removed ids in
    /// ascending order.
    pub fn clean(&mut self) -> Vec<String> {
        let invalid: Vec<String> = self
            .characters
            .values()
            .filter(|c| c.is_invalid())
            .map(|c| c.id.clone())
            .collect();
        for id in &invalid {
            self.characters.remove(id);
        }
        invalid
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(collection: &mut SeriesCollection, id: &str) {
        let c = collection.get_or_create(id, false);
        c.add_name("en_US", id);
        c.add_avatar(id);
    }

    // -- Avatar ----------------------------------------------------------------

    #[test]
    fn raw_path_is_derived_from_series_and_id() {
        let avatar = Avatar::new("char_002_amiya", "arknights", "char_002_amiya#2");
        assert_eq!(avatar.raw_path(), "avatar/arknights/char_002_amiya#2");
    }

    #[test]
    fn short_id_strips_character_prefix() {
        let avatar = Avatar::new("char_002_amiya", "arknights", "char_002_amiya#2");
        assert_eq!(avatar.short_id(), "#2");

        let base = Avatar::new("char_002_amiya", "arknights", "char_002_amiya");
        assert_eq!(base.short_id(), "");
    }

    #[test]
    fn short_id_falls_back_to_marked_id() {
        let avatar = Avatar::new("c1", "test", "a1");
        assert_eq!(avatar.short_id(), "id:a1");
    }

    #[test]
    fn external_avatar_uses_url() {
        let url = "https://cdn.example/special/x.webp";
        let avatar = Avatar::external("c1", "test", "override-000", url);
        assert_eq!(avatar.raw_path(), url);
        assert_eq!(avatar.short_id(), url);
        assert!(!avatar.is_derived());
    }

    // -- Character -------------------------------------------------------------

    #[test]
    fn add_name_overwrites_per_locale() {
        let mut c = Character::new("c1", "test");
        c.add_name("en_US", "Fox");
        c.add_name("en_US", "Vixen");
        c.add_name("ja_JP", "キツネ");
        assert_eq!(c.names().len(), 2);
        assert_eq!(c.names()["en_US"], "Vixen");
    }

    #[test]
    fn add_avatar_overwrites_duplicate_id() {
        let mut c = Character::new("c1", "test");
        c.add_avatar("a1");
        c.add_avatar("a1");
        assert_eq!(c.avatars().len(), 1);
    }

    #[test]
    fn add_tag_preserves_first_insert_order() {
        let mut c = Character::new("c1", "test");
        c.add_tag("arknights");
        c.add_tag("operator");
        c.add_tag("arknights");
        assert_eq!(c.tags(), ["arknights", "operator"]);
    }

    #[test]
    fn kind_defaults_to_playable() {
        let mut c = Character::new("enemy_1000_gopro", "arknights");
        assert_eq!(c.kind(), CharacterKind::Playable);
        c.set_kind(CharacterKind::NonPlayable);
        assert_eq!(c.kind().to_string(), "non_playable");
    }

    #[test]
    fn evict_avatar_reports_presence() {
        let mut c = Character::new("c1", "test");
        c.add_avatar("a1");
        assert!(c.evict_avatar("a1"));
        assert!(!c.evict_avatar("a1"));
    }

    // -- SeriesCollection ------------------------------------------------------

    #[test]
    fn get_or_create_is_idempotent() {
        let mut collection = SeriesCollection::new("test");
        collection.get_or_create("c1", false).add_name("en_US", "Fox");
        collection.get_or_create("c1", false).add_avatar("a1");
        assert_eq!(collection.len(), 1);
        let c = collection.get("c1").unwrap();
        assert_eq!(c.names()["en_US"], "Fox");
        assert_eq!(c.avatars().len(), 1);
    }

    #[test]
    fn get_or_create_special_marks_existing() {
        let mut collection = SeriesCollection::new("test");
        collection.get_or_create("c1", false);
        assert!(!collection.get("c1").unwrap().is_special());
        collection.get_or_create("c1", true);
        assert!(collection.get("c1").unwrap().is_special());
        collection.get_or_create("c1", false);
        assert!(collection.get("c1").unwrap().is_special());
    }

    #[test]
    fn clean_removes_characters_missing_names_or_avatars() {
        let mut collection = SeriesCollection::new("test");
        valid(&mut collection, "keep");
        collection.get_or_create("no_avatar", false).add_name("en_US", "x");
        collection.get_or_create("no_name", false).add_avatar("y");
        collection.get_or_create("empty", false);

        let removed = collection.clean();

        assert_eq!(removed, ["empty", "no_avatar", "no_name"]);
        assert_eq!(collection.len(), 1);
        assert!(collection.get("keep").is_some());
    }

    #[test]
    fn clean_is_idempotent() {
        let mut collection = SeriesCollection::new("test");
        valid(&mut collection, "a");
        valid(&mut collection, "b");
        collection.get_or_create("c", false);

        collection.clean();
        let once = collection.clone();
        let removed = collection.clean();

        assert!(removed.is_empty());
        assert_eq!(collection, once);
    }
}
