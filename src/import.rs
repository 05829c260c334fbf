//! Import/export documents and the import reconciler
//!
//! The export side writes a versioned JSON document describing the
//! playlist's order (and optionally metadata). The import side accepts
//! that document — or a bare array with looser key casing — and derives
//! what would have to change: items to add, entries to remove, and a
//! duplicate-aware target order.

use crate::changeset::{ImportOptions, ImportPlan};
use crate::error::{Error, Result};
use crate::merge::{normalize_date, normalize_tags, tags_equal, FieldEdit, PendingEdit};
use crate::models::PlaylistEntry;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Current export document version
pub const EXPORT_VERSION: u32 = 1;

/// Versioned export document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,
    pub playlist_id: String,
    pub playlist_name: String,
    pub exported_at: DateTime<Utc>,
    pub items: Vec<ImportItem>,
}

/// One item reference in an import or export document
///
/// Every metadata field is independently mentioned-or-not: a document
/// omitting a field never overwrites it. PascalCase aliases keep hand-
/// edited and third-party documents importable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportItem {
    #[serde(alias = "ItemId", alias = "Id", alias = "id")]
    pub item_id: String,
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "type",
        alias = "Type",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, alias = "SeriesName", skip_serializing_if = "Option::is_none")]
    pub series_name: Option<String>,
    #[serde(default, alias = "SeasonNumber", skip_serializing_if = "Option::is_none")]
    pub season_number: Option<i32>,
    #[serde(default, alias = "EpisodeNumber", skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<i32>,
    #[serde(
        default,
        alias = "EpisodeNumberEnd",
        skip_serializing_if = "Option::is_none"
    )]
    pub episode_number_end: Option<i32>,
    #[serde(default, alias = "PremiereDate", skip_serializing_if = "Option::is_none")]
    pub premiere_date: Option<String>,
    #[serde(
        default,
        alias = "ProductionYear",
        skip_serializing_if = "Option::is_none"
    )]
    pub production_year: Option<i32>,
    #[serde(default, alias = "SortName", skip_serializing_if = "Option::is_none")]
    pub sort_name: Option<String>,
    #[serde(default, alias = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, alias = "Tagline", skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

/// The editable metadata fields an import mentions for one item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportMetadata {
    pub sort_name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tagline: Option<String>,
    pub premiere_date: Option<String>,
    pub production_year: Option<i32>,
}

impl ImportMetadata {
    pub fn is_empty(&self) -> bool {
        self.sort_name.is_none()
            && self.tags.is_none()
            && self.tagline.is_none()
            && self.premiere_date.is_none()
            && self.production_year.is_none()
    }
}

impl From<&ImportItem> for ImportMetadata {
    fn from(item: &ImportItem) -> Self {
        Self {
            sort_name: item.sort_name.clone(),
            tags: item.tags.clone(),
            tagline: item.tagline.clone(),
            premiere_date: item.premiere_date.clone(),
            production_year: item.production_year,
        }
    }
}

// ============================================================================
// Export
// ============================================================================

/// Build the export document for a fully loaded playlist
pub fn export_document(
    playlist_id: &str,
    playlist_name: &str,
    entries: &[PlaylistEntry],
    include_metadata: bool,
    exported_at: DateTime<Utc>,
) -> ExportDocument {
    let items = entries
        .iter()
        .map(|entry| {
            let mut item = ImportItem {
                item_id: entry.item_id.clone(),
                name: Some(entry.name.clone()),
                kind: (!entry.kind.is_empty()).then(|| entry.kind.clone()),
                series_name: entry.series_name.clone(),
                season_number: entry.season_number,
                episode_number: entry.episode_number,
                episode_number_end: entry.episode_number_end,
                premiere_date: entry.premiere_date.map(format_export_date),
                production_year: entry.production_year,
                ..Default::default()
            };
            if include_metadata {
                item.sort_name = entry.sort_name.clone();
                item.tags = Some(entry.tags.clone());
                item.tagline = entry.tagline().map(str::to_string);
            }
            item
        })
        .collect();

    ExportDocument {
        version: EXPORT_VERSION,
        playlist_id: playlist_id.to_string(),
        playlist_name: playlist_name.to_string(),
        exported_at,
        items,
    }
}

// ============================================================================
// Import normalization
// ============================================================================

/// Normalize an import payload into a list of items.
///
/// Accepts either the versioned document shape or a bare array; array
/// elements may be objects or bare item-id strings. Elements without a
/// resolvable item id are dropped; the import is rejected only when
/// nothing survives.
pub fn normalize_import(payload: &serde_json::Value) -> Result<Vec<ImportItem>> {
    let raw_items = match payload {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(map) => map
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("items"))
            .and_then(|(_, v)| v.as_array())
            .ok_or_else(|| Error::MalformedImport("no items array".to_string()))?
            .as_slice(),
        _ => {
            return Err(Error::MalformedImport(
                "expected an object with items or a bare array".to_string(),
            ))
        }
    };

    let mut items = Vec::with_capacity(raw_items.len());
    for raw in raw_items {
        let parsed = match raw {
            serde_json::Value::String(id) => Some(ImportItem {
                item_id: id.clone(),
                ..Default::default()
            }),
            serde_json::Value::Object(_) => serde_json::from_value(raw.clone()).ok(),
            _ => None,
        };
        match parsed {
            Some(item) if !item.item_id.trim().is_empty() => items.push(item),
            _ => tracing::warn!("Dropping import element without a resolvable item id"),
        }
    }

    if items.is_empty() {
        return Err(Error::EmptyImport);
    }
    Ok(items)
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Resolve the target order an import implies.
///
/// Current entries are grouped into per-item-id queues that preserve the
/// relative order of duplicate occurrences; walking the import in file
/// order pops the next queued occurrence, so duplicates are matched
/// positionally, never by arbitrary pick. When `remove_extra` is false,
/// unconsumed entries are appended in their original relative order —
/// every current entry appears exactly once in the output.
pub fn build_target_order(
    current: &[PlaylistEntry],
    import_ids: &[String],
    remove_extra: bool,
) -> Vec<PlaylistEntry> {
    let mut queues: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (index, entry) in current.iter().enumerate() {
        queues.entry(entry.item_id.as_str()).or_default().push_back(index);
    }

    let mut consumed = vec![false; current.len()];
    let mut target = Vec::with_capacity(current.len());

    for id in import_ids {
        if let Some(index) = queues.get_mut(id.as_str()).and_then(VecDeque::pop_front) {
            consumed[index] = true;
            target.push(current[index].clone());
        }
    }

    if !remove_extra {
        for (index, entry) in current.iter().enumerate() {
            if !consumed[index] {
                target.push(entry.clone());
            }
        }
    }

    target
}

/// Reconcile an import against the current entries into an [`ImportPlan`]
pub fn reconcile(
    current: &[PlaylistEntry],
    items: &[ImportItem],
    options: ImportOptions,
) -> ImportPlan {
    let import_order: Vec<String> = items.iter().map(|i| i.item_id.clone()).collect();
    let current_ids: HashSet<&str> = current.iter().map(|e| e.item_id.as_str()).collect();
    let import_ids: HashSet<&str> = import_order.iter().map(String::as_str).collect();

    // Candidates to add: import ids with no playlist occurrence at all
    let mut missing_ids = Vec::new();
    let mut seen = HashSet::new();
    for id in &import_order {
        if !current_ids.contains(id.as_str()) && seen.insert(id.as_str()) {
            missing_ids.push(id.clone());
        }
    }

    // Candidates to remove: local entries whose item is absent from the
    // import. Entries without an entry id cannot be addressed by the
    // delete endpoint and are reported, not silently dropped.
    let mut extra_entry_ids = Vec::new();
    if options.remove_extra {
        for entry in current {
            if !import_ids.contains(entry.item_id.as_str()) {
                match &entry.entry_id {
                    Some(id) => extra_entry_ids.push(id.clone()),
                    None => tracing::warn!(
                        "Entry for item {} has no entry id and cannot be removed",
                        entry.item_id
                    ),
                }
            }
        }
    }

    let preview_order = build_target_order(current, &import_order, options.remove_extra)
        .into_iter()
        .filter_map(|e| e.entry_id)
        .collect();

    let mut metadata = HashMap::new();
    if options.apply_metadata {
        for item in items {
            let meta = ImportMetadata::from(item);
            if !meta.is_empty() {
                metadata.insert(item.item_id.clone(), meta);
            }
        }
    }

    ImportPlan {
        missing_ids,
        extra_entry_ids,
        import_order,
        preview_order,
        metadata,
        options,
    }
}

/// Convert import-mentioned metadata into a pending edit against a base
/// entry, after normalization. Fields equal to the base produce no edit;
/// `None` means the item needs no patch at all.
pub fn edit_from_import(base: &PlaylistEntry, meta: &ImportMetadata) -> Option<PendingEdit> {
    let mut edit = PendingEdit::default();

    if let Some(tags) = &meta.tags {
        let tags: Vec<String> = tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags_equal(&tags, &base.tags) {
            edit.tags = if tags.is_empty() {
                FieldEdit::Clear
            } else {
                FieldEdit::Set(tags)
            };
        }
    }

    if let Some(tagline) = &meta.tagline {
        edit.tagline = stage_import_string(tagline, base.tagline().unwrap_or(""));
    }
    if let Some(sort_name) = &meta.sort_name {
        edit.sort_name = stage_import_string(sort_name, base.sort_name.as_deref().unwrap_or(""));
    }

    if let Some(raw) = &meta.premiere_date {
        match (normalize_date(raw), base.premiere_date) {
            // Unparseable dates in an import are ignored, not fatal
            (None, _) => tracing::warn!("Ignoring unparseable import date: {}", raw),
            (Some(date), base_date) => {
                if base_date != Some(date) {
                    edit.premiere_date = FieldEdit::Set(date);
                }
            }
        }
    }

    if let Some(year) = meta.production_year {
        if base.production_year != Some(year) {
            edit.production_year = FieldEdit::Set(year);
        }
    }

    (!edit.is_empty()).then_some(edit)
}

fn stage_import_string(raw: &str, base: &str) -> FieldEdit<String> {
    let value = raw.trim();
    if value == base.trim() {
        FieldEdit::Inherit
    } else if value.is_empty() {
        FieldEdit::Clear
    } else {
        FieldEdit::Set(value.to_string())
    }
}

/// Render a premiere date the way export documents carry it
pub fn format_export_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(item_id: &str, entry_id: &str) -> PlaylistEntry {
        PlaylistEntry {
            item_id: item_id.to_string(),
            entry_id: Some(entry_id.to_string()),
            name: item_id.to_uppercase(),
            kind: "Audio".to_string(),
            series_name: None,
            season_number: None,
            episode_number: None,
            episode_number_end: None,
            tags: Vec::new(),
            taglines: Vec::new(),
            sort_name: None,
            premiere_date: None,
            production_year: None,
        }
    }

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_accepts_versioned_document() {
        let items = normalize_import(&json!({
            "version": 1,
            "playlistId": "p1",
            "items": [{ "itemId": "a" }, { "itemId": "b" }]
        }))
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_id, "a");
    }

    #[test]
    fn test_normalize_accepts_bare_array_and_loose_casing() {
        let items = normalize_import(&json!([
            { "ItemId": "a", "ProductionYear": 1999 },
            { "Id": "b" },
            "c",
            { "Name": "no id, dropped" }
        ]))
        .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].production_year, Some(1999));
        assert_eq!(items[2].item_id, "c");
    }

    #[test]
    fn test_normalize_rejects_empty_import() {
        assert!(matches!(
            normalize_import(&json!([{ "Name": "nothing" }])),
            Err(Error::EmptyImport)
        ));
        assert!(matches!(
            normalize_import(&json!("just a string")),
            Err(Error::MalformedImport(_))
        ));
    }

    #[test]
    fn test_duplicates_matched_by_original_relative_order() {
        // Current [A, A, B], import order [A, B, A]: the first A in the
        // import takes the first A occurrence, not an arbitrary one.
        let current = vec![entry("A", "a1"), entry("A", "a2"), entry("B", "b1")];
        let target = build_target_order(&current, &ids(&["A", "B", "A"]), false);
        let entry_ids: Vec<_> = target.iter().map(|e| e.entry_id.clone().unwrap()).collect();
        assert_eq!(entry_ids, vec!["a1", "b1", "a2"]);
    }

    #[test]
    fn test_unconsumed_entries_kept_in_relative_order() {
        let current = vec![
            entry("A", "a1"),
            entry("B", "b1"),
            entry("C", "c1"),
            entry("D", "d1"),
        ];
        let target = build_target_order(&current, &ids(&["D", "B"]), false);
        let entry_ids: Vec<_> = target.iter().map(|e| e.entry_id.clone().unwrap()).collect();
        // Every current entry appears exactly once
        assert_eq!(entry_ids, vec!["d1", "b1", "a1", "c1"]);
    }

    #[test]
    fn test_remove_extra_drops_unconsumed() {
        let current = vec![entry("A", "a1"), entry("B", "b1"), entry("C", "c1")];
        let target = build_target_order(&current, &ids(&["C", "A"]), true);
        let entry_ids: Vec<_> = target.iter().map(|e| e.entry_id.clone().unwrap()).collect();
        assert_eq!(entry_ids, vec!["c1", "a1"]);
    }

    #[test]
    fn test_reconcile_missing_and_extra() {
        let current = vec![entry("A", "a1"), entry("B", "b1")];
        let items = vec![
            ImportItem {
                item_id: "B".to_string(),
                ..Default::default()
            },
            ImportItem {
                item_id: "X".to_string(),
                ..Default::default()
            },
            ImportItem {
                item_id: "X".to_string(),
                ..Default::default()
            },
        ];
        let options = ImportOptions {
            remove_extra: true,
            ..Default::default()
        };
        let plan = reconcile(&current, &items, options);
        // X listed twice but added once; A is extra
        assert_eq!(plan.missing_ids, vec!["X"]);
        assert_eq!(plan.extra_entry_ids, vec!["a1"]);
        assert_eq!(plan.preview_order, vec!["b1"]);
    }

    #[test]
    fn test_export_import_round_trip_is_idempotent() {
        let current = vec![entry("A", "a1"), entry("B", "b1"), entry("A", "a2")];
        let doc = export_document("p1", "My List", &current, false, Utc::now());
        let payload = serde_json::to_value(&doc).unwrap();

        let items = normalize_import(&payload).unwrap();
        let options = ImportOptions {
            add_missing: true,
            remove_extra: true,
            apply_order: true,
            apply_metadata: false,
            dry_run: true,
        };
        let plan = reconcile(&current, &items, options);

        assert!(plan.missing_ids.is_empty());
        assert!(plan.extra_entry_ids.is_empty());
        // Order already matches: the plan implies zero moves
        let current_ids: Vec<String> =
            current.iter().map(|e| e.entry_id.clone().unwrap()).collect();
        assert_eq!(plan.preview_order, current_ids);
        assert!(crate::planner::plan_moves(&current_ids, &plan.preview_order).is_empty());
    }

    #[test]
    fn test_export_metadata_only_when_requested() {
        let mut e = entry("A", "a1");
        e.tags = vec!["jazz".to_string()];
        e.sort_name = Some("a sort".to_string());

        let bare = export_document("p1", "L", &[e.clone()], false, Utc::now());
        assert!(bare.items[0].tags.is_none());
        assert!(bare.items[0].sort_name.is_none());

        let full = export_document("p1", "L", &[e], true, Utc::now());
        assert_eq!(full.items[0].tags.as_deref(), Some(&["jazz".to_string()][..]));
        assert_eq!(full.items[0].sort_name.as_deref(), Some("a sort"));
    }

    #[test]
    fn test_edit_from_import_compares_against_base() {
        let mut base = entry("A", "a1");
        base.tags = vec!["Jazz".to_string(), "Modal".to_string()];
        base.production_year = Some(1959);

        // Same tags (different case/order) and same year: no patch needed
        let meta = ImportMetadata {
            tags: Some(vec!["modal".to_string(), "jazz".to_string()]),
            production_year: Some(1959),
            ..Default::default()
        };
        assert!(edit_from_import(&base, &meta).is_none());

        // A mentioned empty tagline clears; an omitted sort name is untouched
        let meta = ImportMetadata {
            tagline: Some(String::new()),
            production_year: Some(1960),
            ..Default::default()
        };
        let mut with_tagline = base.clone();
        with_tagline.taglines = vec!["old line".to_string()];
        let edit = edit_from_import(&with_tagline, &meta).unwrap();
        assert_eq!(edit.tagline, FieldEdit::Clear);
        assert_eq!(edit.production_year, FieldEdit::Set(1960));
        assert!(edit.sort_name.is_inherit());
    }
}
