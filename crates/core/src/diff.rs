//! Avatar delta between the local collection and the published document.

use crate::document::PublishedDocument;
use crate::entity::{CharacterKind, SeriesCollection};

/// An avatar that has to be (re)uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAvatar {
    pub character_id: String,
    pub avatar_id: String,
    pub kind: CharacterKind,
    pub raw_path: String,
}

/// Every derived avatar of a non-special character whose short id is not
/// listed for that character in `remote`. Characters absent from `remote`
/// contribute all their avatars. Results are ordered by character id, then
/// avatar id.
pub fn pending_avatars(
    collection: &SeriesCollection,
    remote: &PublishedDocument,
) -> Vec<PendingAvatar> {
    let mut pending = Vec::new();
    for (id, character) in collection.characters() {
        if character.is_special() {
            continue;
        }
        let published = remote.get(id);
        for avatar in character.avatars().values() {
            if !avatar.is_derived() {
                continue;
            }
            let known = published.is_some_and(|p| p.has_avatar(&avatar.short_id()));
            if !known {
                pending.push(PendingAvatar {
                    character_id: id.clone(),
                    avatar_id: avatar.avatar_id().to_string(),
                    kind: character.kind(),
                    raw_path: avatar.raw_path(),
                });
            }
        }
    }
    pending
}

#[cfg(test)]
mod tests {
    use crate::overrides::{merge_overrides, OverrideDocument};

    use super::*;

    #[test]
    fn new_character_flags_every_avatar() {
        let mut collection = SeriesCollection::new("test");
        let c = collection.get_or_create("c1", false);
        c.add_name("en", "Fox");
        c.add_avatar("a1");

        let pending = pending_avatars(&collection, &PublishedDocument::default());

        assert_eq!(
            pending,
            [PendingAvatar {
                character_id: "c1".to_string(),
                avatar_id: "a1".to_string(),
                kind: CharacterKind::Playable,
                raw_path: "avatar/test/a1".to_string(),
            }]
        );
    }

    #[test]
    fn known_short_ids_are_skipped() {
        let mut collection = SeriesCollection::new("arknights");
        let c = collection.get_or_create("char_002_amiya", false);
        c.add_name("en_US", "Amiya");
        c.add_avatar("char_002_amiya");
        c.add_avatar("char_002_amiya#2");
        c.set_kind(CharacterKind::Playable);

        let remote =
            PublishedDocument::parse(r#"{"char_002_amiya": {"avatars": [""]}}"#).unwrap();
        let pending = pending_avatars(&collection, &remote);

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].avatar_id, "char_002_amiya#2");
    }

    #[test]
    fn special_characters_are_never_diffed() {
        let mut collection = SeriesCollection::new("test");
        let doc = OverrideDocument::parse(
            r#"{"s1": {"names": {"en": "S"}, "avatars": ["https://cdn.example/s1.webp"]}}"#,
        )
        .unwrap();
        merge_overrides(&mut collection, &doc);
        // A derived avatar added afterwards is still ignored.
        collection.get_or_create("s1", false).add_avatar("s1_extra");

        assert!(pending_avatars(&collection, &PublishedDocument::default()).is_empty());
    }

    #[test]
    fn kind_is_carried_into_pending_entries() {
        let mut collection = SeriesCollection::new("arknights");
        let c = collection.get_or_create("enemy_1000_gopro", false);
        c.add_name("zh_CN", "源石虫");
        c.add_avatar("enemy_1000_gopro");
        c.set_kind(CharacterKind::NonPlayable);

        let pending = pending_avatars(&collection, &PublishedDocument::default());
        assert_eq!(pending[0].kind, CharacterKind::NonPlayable);
    }
}
