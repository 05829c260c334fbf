//! Data models for Jellyfin playlist responses
//!
//! Wire DTOs mirror the server's PascalCase JSON. The in-memory
//! [`PlaylistEntry`] is the engine's view of one playlist occurrence;
//! its position is derived from its index in the session's ordered list
//! and is never stored authoritatively.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Wire DTOs
// ============================================================================

/// One page of `GET /Playlists/{id}/Items`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsPage {
    /// Items in this page, in playlist order
    #[serde(default)]
    pub items: Vec<ItemDto>,
    /// Total number of entries in the playlist, when the server reports it
    #[serde(default)]
    pub total_record_count: Option<u64>,
    /// Index of the first item in this page
    #[serde(default)]
    pub start_index: Option<u64>,
}

/// Subset of the server's item DTO the engine cares about
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemDto {
    /// Media item id (stable across reorders, may repeat in a playlist)
    #[serde(default)]
    pub id: Option<String>,
    /// Playlist-entry id for this occurrence. Some server builds emit
    /// `PlaylistItemID`, so both spellings are accepted.
    #[serde(default, alias = "PlaylistItemID")]
    pub playlist_item_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "Type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub series_name: Option<String>,
    /// Season number for episodes
    #[serde(default)]
    pub parent_index_number: Option<i32>,
    /// Episode number
    #[serde(default)]
    pub index_number: Option<i32>,
    /// Last episode number for multi-episode files
    #[serde(default)]
    pub index_number_end: Option<i32>,
    /// ISO datetime, e.g. `2019-05-01T00:00:00.0000000Z`
    #[serde(default)]
    pub premiere_date: Option<String>,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default)]
    pub sort_name: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub taglines: Option<Vec<String>>,
}

/// Minimal playlist descriptor for discovery listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
}

// ============================================================================
// Entry model
// ============================================================================

/// One occurrence of a media item within the playlist's order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Identity of the underlying media item; not unique within a playlist
    pub item_id: String,
    /// Identity of this occurrence; required to move or delete it
    pub entry_id: Option<String>,
    pub name: String,
    /// Server item type (`Movie`, `Episode`, `Audio`, ...)
    pub kind: String,
    pub series_name: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub episode_number_end: Option<i32>,
    /// Free-form tags; compared order-insensitively and case-insensitively
    pub tags: Vec<String>,
    /// All taglines; the first one is the editable field
    pub taglines: Vec<String>,
    pub sort_name: Option<String>,
    pub premiere_date: Option<NaiveDate>,
    pub production_year: Option<i32>,
}

impl PlaylistEntry {
    /// Build an entry from a server DTO. Items without an id are not
    /// representable and yield `None`.
    pub fn from_dto(dto: ItemDto) -> Option<Self> {
        let item_id = dto.id?;
        Some(Self {
            item_id,
            entry_id: dto.playlist_item_id.filter(|s| !s.is_empty()),
            name: dto.name.unwrap_or_else(|| "(unnamed)".to_string()),
            kind: dto.item_type.unwrap_or_default(),
            series_name: dto.series_name,
            season_number: dto.parent_index_number,
            episode_number: dto.index_number,
            episode_number_end: dto.index_number_end,
            tags: dto.tags.unwrap_or_default(),
            taglines: dto.taglines.unwrap_or_default(),
            sort_name: dto.sort_name,
            premiere_date: dto.premiere_date.as_deref().and_then(parse_server_date),
            production_year: dto.production_year,
        })
    }

    /// The primary tagline, if any
    pub fn tagline(&self) -> Option<&str> {
        self.taglines.first().map(String::as_str)
    }
}

/// Parse the date portion of a server datetime (`2019-05-01T00:00:00...`)
/// or a bare `YYYY-MM-DD`.
pub fn parse_server_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_page_deserialization() {
        let page: ItemsPage = serde_json::from_value(json!({
            "Items": [
                {
                    "Id": "item-1",
                    "PlaylistItemId": "entry-1",
                    "Name": "So What",
                    "Type": "Audio",
                    "PremiereDate": "1959-08-17T00:00:00.0000000Z",
                    "ProductionYear": 1959,
                    "Tags": ["jazz", "modal"]
                }
            ],
            "TotalRecordCount": 42,
            "StartIndex": 0
        }))
        .unwrap();

        assert_eq!(page.total_record_count, Some(42));
        let entry = PlaylistEntry::from_dto(page.items[0].clone()).unwrap();
        assert_eq!(entry.item_id, "item-1");
        assert_eq!(entry.entry_id.as_deref(), Some("entry-1"));
        assert_eq!(entry.premiere_date, NaiveDate::from_ymd_opt(1959, 8, 17));
        assert_eq!(entry.production_year, Some(1959));
        assert_eq!(entry.tags, vec!["jazz", "modal"]);
    }

    #[test]
    fn test_playlist_item_id_alternate_spelling() {
        let dto: ItemDto = serde_json::from_value(json!({
            "Id": "item-1",
            "PlaylistItemID": "entry-1"
        }))
        .unwrap();
        assert_eq!(dto.playlist_item_id.as_deref(), Some("entry-1"));
    }

    #[test]
    fn test_entry_without_item_id_is_dropped() {
        let dto: ItemDto = serde_json::from_value(json!({ "Name": "orphan" })).unwrap();
        assert!(PlaylistEntry::from_dto(dto).is_none());
    }

    #[test]
    fn test_parse_server_date() {
        assert_eq!(
            parse_server_date("2019-05-01T00:00:00.0000000Z"),
            NaiveDate::from_ymd_opt(2019, 5, 1)
        );
        assert_eq!(parse_server_date("2019-05-01"), NaiveDate::from_ymd_opt(2019, 5, 1));
        assert_eq!(parse_server_date("not a date"), None);
    }
}
