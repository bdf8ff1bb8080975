//! [`Adapter`] implementation for Arknights.
//!
//! Game data comes from the community dump of the client's excel tables,
//! one directory per locale; avatar images come from the bot resource
//! mirror, split into `avatar/` (operators) and `enemy/`.

use async_trait::async_trait;
use futures::future::try_join_all;

use charsync_core::diff::PendingAvatar;
use charsync_core::{Adapter, CharacterKind, Fetcher, SeriesCollection, SyncError, SyncResult};

use crate::tables::{parse_table, CharacterTable, EnemyTable, SkinTable};
use crate::transliterate::{full_pinyin, pinyin_initials};

pub const SERIES: &str = "arknights";

/// Locales read from the game data, in the order they are applied.
pub const LOCALES: [&str; 3] = ["zh_CN", "en_US", "ja_JP"];

/// Locale that also contributes pinyin, codes, tags and enemy avatars.
const PRIMARY_LOCALE: &str = "zh_CN";

pub const DEFAULT_GAME_DATA_URL: &str = "https://github.com/Kengxxiao/ArknightsGameData/raw/master";
pub const DEFAULT_AVATAR_URL: &str = "https://github.com/yuanyan3060/Arknights-Bot-Resource/raw/main";

const ENEMY_TAG: &str = "enemy";

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Populates the `arknights` series.
#[derive(Debug, Clone)]
pub struct ArknightsAdapter {
    game_data_url: String,
    avatar_url: String,
}

/// Both tables of one locale.
struct LocaleTables {
    locale: &'static str,
    characters: CharacterTable,
    enemies: EnemyTable,
}

impl Default for ArknightsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArknightsAdapter {
    pub fn new() -> Self {
        Self::with_sources(DEFAULT_GAME_DATA_URL, DEFAULT_AVATAR_URL)
    }

    /// Point the adapter at other game data / avatar roots.
    pub fn with_sources(game_data_url: &str, avatar_url: &str) -> Self {
        Self {
            game_data_url: game_data_url.trim_end_matches('/').to_string(),
            avatar_url: avatar_url.trim_end_matches('/').to_string(),
        }
    }

    fn table_url(&self, locale: &str, table: &str) -> String {
        format!("{}/{locale}/gamedata/excel/{table}.json", self.game_data_url)
    }

    async fn fetch_locale(
        &self,
        fetcher: &dyn Fetcher,
        locale: &'static str,
    ) -> SyncResult<LocaleTables> {
        let characters_url = self.table_url(locale, "character_table");
        let enemies_url = self.table_url(locale, "enemy_handbook_table");
        let (characters, enemies) = futures::try_join!(
            fetcher.fetch_text(&characters_url),
            fetcher.fetch_text(&enemies_url),
        )?;
        tracing::info!(series = SERIES, locale, "Fetched game data");

        Ok(LocaleTables {
            locale,
            characters: parse_table("character_table", &characters)?,
            enemies: parse_table("enemy_handbook_table", &enemies)?,
        })
    }

    async fn fetch_skins(&self, fetcher: &dyn Fetcher) -> SyncResult<SkinTable> {
        let url = self.table_url(PRIMARY_LOCALE, "skin_table");
        let text = fetcher.fetch_text(&url).await?;
        parse_table("skin_table", &text)
    }
}

#[async_trait]
impl Adapter for ArknightsAdapter {
    fn series(&self) -> &str {
        SERIES
    }

    async fn populate(
        &self,
        fetcher: &dyn Fetcher,
        collection: &mut SeriesCollection,
    ) -> SyncResult<()> {
        let (locales, skins) = futures::try_join!(
            try_join_all(LOCALES.map(|locale| self.fetch_locale(fetcher, locale))),
            self.fetch_skins(fetcher),
        )?;

        for tables in &locales {
            apply_characters(collection, tables.locale, &tables.characters);
            apply_enemies(collection, tables.locale, &tables.enemies);
            tracing::info!(
                series = SERIES,
                locale = tables.locale,
                characters = tables.characters.len(),
                enemies = tables.enemies.len(),
                "Applied locale"
            );
        }
        apply_skins(collection, &skins);
        tracing::info!(series = SERIES, skins = skins.char_skins.len(), "Applied skins");

        Ok(())
    }

    fn avatar_url(&self, avatar: &PendingAvatar) -> SyncResult<String> {
        let dir = match avatar.kind {
            CharacterKind::Playable => "avatar",
            CharacterKind::NonPlayable => "enemy",
        };
        let mut url = reqwest::Url::parse(&self.avatar_url)
            .map_err(|e| SyncError::Transport(format!("invalid avatar root {}: {e}", self.avatar_url)))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::Transport(format!("avatar root {} cannot take a path", self.avatar_url)))?
            .pop_if_empty()
            .push(dir)
            .push(&format!("{}.png", avatar.avatar_id));
        Ok(url.to_string())
    }
}

// ---------------------------------------------------------------------------
// Table application
// ---------------------------------------------------------------------------

fn apply_characters(collection: &mut SeriesCollection, locale: &str, table: &CharacterTable) {
    for (id, entry) in table {
        let character = collection.get_or_create(id, false);
        character.add_tag(SERIES);
        character.add_name(locale, &entry.name);

        if locale == PRIMARY_LOCALE {
            character.add_name("py", &full_pinyin(&entry.name));
            character.add_name("fpy", &pinyin_initials(&entry.name));
            character.add_tag(entry.role_tag());
            if let Some(code) = entry.code() {
                character.add_name("code", code);
            }
        }
    }
}

fn apply_enemies(collection: &mut SeriesCollection, locale: &str, table: &EnemyTable) {
    for (id, entry) in table {
        let enemy = collection.get_or_create(id, false);
        enemy.add_tag(SERIES);
        enemy.set_kind(CharacterKind::NonPlayable);
        enemy.add_name(locale, &entry.name);

        if locale == PRIMARY_LOCALE {
            enemy.add_name("py", &full_pinyin(&entry.name));
            enemy.add_name("fpy", &pinyin_initials(&entry.name));
            enemy.add_name("code", &entry.enemy_index);
            enemy.add_avatar(id);
            enemy.add_tag(ENEMY_TAG);
        }
    }
}

fn apply_skins(collection: &mut SeriesCollection, skins: &SkinTable) {
    for skin in skins.char_skins.values() {
        let character = collection.get_or_create(&skin.char_id, false);
        character.add_tag(SERIES);
        character.add_avatar(&skin.avatar_id);
    }
}
