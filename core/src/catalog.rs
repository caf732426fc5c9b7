use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// One menu entry; entries naming a `scriptFile` are games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "scriptFile")]
    pub script_file: Option<String>,
    #[serde(default)]
    pub playlist: Playlist,
    /// Free-text instructions, shown verbatim.
    #[serde(default)]
    pub game_play: Option<String>,
}

impl CatalogEntry {
    pub fn cartridge_name(&self) -> Option<&str> {
        self.script_file
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// The static content catalog (`shows.json`), restricted to what the games consume.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub content: BTreeMap<String, BTreeMap<String, CatalogEntry>>,
}

/// Where an entry lives in the catalog: `(content type, key)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryRef {
    pub content_type: String,
    pub key: String,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| GameError::InvalidCatalog(err.to_string()))
    }

    pub fn entry(&self, entry: &EntryRef) -> Option<&CatalogEntry> {
        self.content.get(&entry.content_type)?.get(&entry.key)
    }

    /// Every entry that loads a cartridge, in catalog order.
    pub fn games(&self) -> Vec<(EntryRef, &CatalogEntry)> {
        self.content
            .iter()
            .flat_map(|(content_type, entries)| {
                entries.iter().map(move |(key, entry)| {
                    let entry_ref = EntryRef {
                        content_type: content_type.clone(),
                        key: key.clone(),
                    };
                    (entry_ref, entry)
                })
            })
            .filter(|(_, entry)| entry.cartridge_name().is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOWS: &str = r#"{
        "siteConfig": {"heroBgVideoId": "hero"},
        "content": {
            "gateways": {
                "arcade-jigsaw": {
                    "title": "Video Jigsaw",
                    "scriptFile": "jigsaw.js",
                    "game_play": "Drag the pieces into place.",
                    "playlist": [{"videoId": "a1", "title": "One", "startSeconds": "0", "endSeconds": "80"}]
                },
                "lobby": {"title": "Lobby", "scriptFile": "", "playlist": []}
            },
            "wines": {
                "red": {"title": "Red", "description": "A red", "playlist": [{"videoId": "r1"}]}
            }
        },
        "siteLinks": [{"linkText": "Home", "linkUrl": "https://example.com"}]
    }"#;

    #[test]
    fn games_are_entries_with_a_script() {
        let catalog = Catalog::from_json(SHOWS).unwrap();
        let games = catalog.games();

        assert_eq!(games.len(), 1);
        let (entry_ref, entry) = &games[0];
        assert_eq!(entry_ref.key, "arcade-jigsaw");
        assert_eq!(entry.cartridge_name(), Some("jigsaw.js"));
        assert_eq!(entry.game_play.as_deref(), Some("Drag the pieces into place."));
        assert_eq!(entry.playlist[0].end_seconds, Some(80));
        assert_eq!(catalog.entry(entry_ref), Some(*entry));
    }

    #[test]
    fn one_bad_time_value_keeps_the_other_games() {
        let json = r#"{"content": {"gateways": {
            "arcade-jigsaw": {"title": "Jigsaw", "scriptFile": "jigsaw.js",
                "playlist": [{"videoId": "a1", "endSeconds": 80}]},
            "arcade-sequence": {"title": "Sequence", "scriptFile": "sequence-puzzle.js",
                "playlist": [{"videoId": "s1", "startSeconds": "1:30", "endSeconds": "90"}]}
        }}}"#;
        let catalog = Catalog::from_json(json).unwrap();

        assert_eq!(catalog.games().len(), 2);
        let sequence = &catalog.content["gateways"]["arcade-sequence"].playlist[0];
        assert_eq!(sequence.start_seconds, None);
        assert_eq!(sequence.end_seconds, Some(90));
    }

    #[test]
    fn malformed_catalog_is_a_content_error() {
        assert!(matches!(
            Catalog::from_json("{\"content\": 3}"),
            Err(GameError::InvalidCatalog(_))
        ));
    }
}
