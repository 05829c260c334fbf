//! Metadata merge layer
//!
//! Pending edits never overwrite an entry until the server confirms a
//! save; until then this layer answers "what would this entry look like"
//! and keeps the edit map minimal. The central discipline is the
//! tri-state [`FieldEdit`]: a field is *inherited* (base value shows
//! through), *explicitly cleared*, or *set* to a value. Edits are always
//! computed by equality-after-normalization against the **base** value,
//! never against the previous edit, so editing a field back to its
//! original value converges to "no pending change".

use crate::models::{parse_server_date, PlaylistEntry};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Tri-state pending value for one editable field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldEdit<T> {
    /// No explicit value; the base field shows through
    #[default]
    Inherit,
    /// Explicitly emptied
    Clear,
    /// Explicitly set
    Set(T),
}

impl<T> FieldEdit<T> {
    pub fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }

    /// The pending value, if one is explicitly set
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }
}

/// The five editable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    Tags,
    Tagline,
    SortName,
    PremiereDate,
    ProductionYear,
}

/// Pending, uncommitted metadata edits for one media item
///
/// Keyed by item id in the ChangeSet, so an edit applies to every
/// occurrence of the item in the playlist. An instance is kept only
/// while at least one field is not `Inherit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEdit {
    pub tags: FieldEdit<Vec<String>>,
    pub tagline: FieldEdit<String>,
    pub sort_name: FieldEdit<String>,
    pub premiere_date: FieldEdit<NaiveDate>,
    pub production_year: FieldEdit<i32>,
}

impl PendingEdit {
    /// Overlay another edit: fields `other` mentions win, inherited
    /// fields keep this edit's value
    pub fn merge_from(&mut self, other: PendingEdit) {
        if !other.tags.is_inherit() {
            self.tags = other.tags;
        }
        if !other.tagline.is_inherit() {
            self.tagline = other.tagline;
        }
        if !other.sort_name.is_inherit() {
            self.sort_name = other.sort_name;
        }
        if !other.premiere_date.is_inherit() {
            self.premiere_date = other.premiere_date;
        }
        if !other.production_year.is_inherit() {
            self.production_year = other.production_year;
        }
    }

    /// True when every field inherits its base value
    pub fn is_empty(&self) -> bool {
        self.tags.is_inherit()
            && self.tagline.is_inherit()
            && self.sort_name.is_inherit()
            && self.premiere_date.is_inherit()
            && self.production_year.is_inherit()
    }
}

/// Outcome of one edit request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// A set or clear is now pending for the field
    Staged,
    /// The input matches the base value; the field reverted to inherit
    Reverted,
    /// The input could not be interpreted; nothing changed
    Rejected,
}

/// Effective (base overridden by pending edit) view of an entry's
/// editable metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveMetadata {
    pub tags: Vec<String>,
    pub tagline: Option<String>,
    pub sort_name: Option<String>,
    pub premiere_date: Option<NaiveDate>,
    pub production_year: Option<i32>,
}

/// Compute the effective view of `entry` under an optional pending edit
pub fn effective(entry: &PlaylistEntry, edit: Option<&PendingEdit>) -> EffectiveMetadata {
    let base = EffectiveMetadata {
        tags: entry.tags.clone(),
        tagline: entry.tagline().map(str::to_string),
        sort_name: entry.sort_name.clone(),
        premiere_date: entry.premiere_date,
        production_year: entry.production_year,
    };
    let Some(edit) = edit else { return base };

    EffectiveMetadata {
        tags: match &edit.tags {
            FieldEdit::Inherit => base.tags,
            FieldEdit::Clear => Vec::new(),
            FieldEdit::Set(v) => v.clone(),
        },
        tagline: override_opt(&edit.tagline, base.tagline),
        sort_name: override_opt(&edit.sort_name, base.sort_name),
        premiere_date: override_opt(&edit.premiere_date, base.premiere_date),
        production_year: override_opt(&edit.production_year, base.production_year),
    }
}

fn override_opt<T: Clone>(edit: &FieldEdit<T>, base: Option<T>) -> Option<T> {
    match edit {
        FieldEdit::Inherit => base,
        FieldEdit::Clear => None,
        FieldEdit::Set(v) => Some(v.clone()),
    }
}

/// Apply one raw edit to the pending-edit map.
///
/// Normalizes `raw` per field type, compares against the base entry, and
/// stores `Set`/`Clear`/`Inherit` accordingly. The map entry is pruned
/// once all fields inherit.
pub fn apply_edit(
    edits: &mut HashMap<String, PendingEdit>,
    base: &PlaylistEntry,
    field: EditField,
    raw: &str,
) -> EditOutcome {
    let edit = edits.entry(base.item_id.clone()).or_default();

    let outcome = match field {
        EditField::Tags => {
            let tags = normalize_tags(raw);
            stage(&mut edit.tags, &base.tags, tags, |a, b| tags_equal(a, b), Vec::is_empty)
        }
        EditField::Tagline => {
            let base_tagline = base.tagline().unwrap_or("").to_string();
            stage_string(&mut edit.tagline, &base_tagline, raw)
        }
        EditField::SortName => {
            let base_sort = base.sort_name.clone().unwrap_or_default();
            stage_string(&mut edit.sort_name, &base_sort, raw)
        }
        EditField::PremiereDate => {
            let raw = raw.trim();
            if raw.is_empty() {
                stage_cleared(&mut edit.premiere_date, base.premiere_date.is_none())
            } else {
                match normalize_date(raw) {
                    // Unparseable dates are "no change", not an error
                    None => EditOutcome::Rejected,
                    Some(date) => stage_value(&mut edit.premiere_date, base.premiere_date, date),
                }
            }
        }
        EditField::ProductionYear => {
            let raw = raw.trim();
            if raw.is_empty() {
                stage_cleared(&mut edit.production_year, base.production_year.is_none())
            } else {
                match raw.parse::<i32>() {
                    Err(_) => EditOutcome::Rejected,
                    Ok(year) => stage_value(&mut edit.production_year, base.production_year, year),
                }
            }
        }
    };

    if edit.is_empty() {
        edits.remove(&base.item_id);
    }
    outcome
}

/// Stage a normalized multi-value field against its base
fn stage<T>(
    slot: &mut FieldEdit<T>,
    base: &T,
    value: T,
    eq: impl Fn(&T, &T) -> bool,
    is_empty: impl Fn(&T) -> bool,
) -> EditOutcome {
    if eq(&value, base) {
        *slot = FieldEdit::Inherit;
        EditOutcome::Reverted
    } else if is_empty(&value) {
        *slot = FieldEdit::Clear;
        EditOutcome::Staged
    } else {
        *slot = FieldEdit::Set(value);
        EditOutcome::Staged
    }
}

/// Stage a trimmed string field; empty input clears, empty base inherits
fn stage_string(slot: &mut FieldEdit<String>, base: &str, raw: &str) -> EditOutcome {
    let value = raw.trim().to_string();
    stage(slot, &base.to_string(), value, |a, b| a == b, String::is_empty)
}

/// Stage an optional scalar against a base `Option`
fn stage_value<T: PartialEq>(slot: &mut FieldEdit<T>, base: Option<T>, value: T) -> EditOutcome {
    if base.as_ref() == Some(&value) {
        *slot = FieldEdit::Inherit;
        EditOutcome::Reverted
    } else {
        *slot = FieldEdit::Set(value);
        EditOutcome::Staged
    }
}

/// Stage an explicit clear of an optional scalar
fn stage_cleared<T>(slot: &mut FieldEdit<T>, base_is_empty: bool) -> EditOutcome {
    if base_is_empty {
        *slot = FieldEdit::Inherit;
        EditOutcome::Reverted
    } else {
        *slot = FieldEdit::Clear;
        EditOutcome::Staged
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Split a raw tag string on `,` and `;`, trim, and drop empties
pub fn normalize_tags(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Order-insensitive, case-insensitive tag list comparison
pub fn tags_equal(a: &[String], b: &[String]) -> bool {
    let mut a: Vec<String> = a.iter().map(|t| t.to_lowercase()).collect();
    let mut b: Vec<String> = b.iter().map(|t| t.to_lowercase()).collect();
    a.sort();
    b.sort();
    a == b
}

/// Normalize a raw date input to a calendar date.
///
/// Accepts `YYYY-MM-DD` or any ISO datetime string whose date part
/// parses; everything else is `None`.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    parse_server_date(raw.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_entry() -> PlaylistEntry {
        PlaylistEntry {
            item_id: "item-1".to_string(),
            entry_id: Some("entry-1".to_string()),
            name: "So What".to_string(),
            kind: "Audio".to_string(),
            series_name: None,
            season_number: None,
            episode_number: None,
            episode_number_end: None,
            tags: vec!["a".to_string(), "b".to_string()],
            taglines: vec!["cool and modal".to_string()],
            sort_name: Some("so what".to_string()),
            premiere_date: NaiveDate::from_ymd_opt(1959, 8, 17),
            production_year: Some(1959),
        }
    }

    #[test]
    fn test_tags_same_set_different_formatting_is_no_edit() {
        let mut edits = HashMap::new();
        let base = base_entry();
        let outcome = apply_edit(&mut edits, &base, EditField::Tags, "a, b");
        assert_eq!(outcome, EditOutcome::Reverted);
        assert!(edits.is_empty());

        // Case and order do not matter either
        let outcome = apply_edit(&mut edits, &base, EditField::Tags, "B;A");
        assert_eq!(outcome, EditOutcome::Reverted);
        assert!(edits.is_empty());
    }

    #[test]
    fn test_edit_then_revert_leaves_no_entry() {
        let mut edits = HashMap::new();
        let base = base_entry();

        assert_eq!(
            apply_edit(&mut edits, &base, EditField::Tags, "a, b, c"),
            EditOutcome::Staged
        );
        assert_eq!(
            edits["item-1"].tags,
            FieldEdit::Set(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );

        assert_eq!(
            apply_edit(&mut edits, &base, EditField::Tags, "b, a"),
            EditOutcome::Reverted
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_fields_are_independent() {
        let mut edits = HashMap::new();
        let base = base_entry();

        apply_edit(&mut edits, &base, EditField::Tags, "x");
        apply_edit(&mut edits, &base, EditField::ProductionYear, "1960");

        // Reverting one field leaves the other's flag untouched
        apply_edit(&mut edits, &base, EditField::Tags, "a, b");
        let edit = &edits["item-1"];
        assert!(edit.tags.is_inherit());
        assert_eq!(edit.production_year, FieldEdit::Set(1960));
    }

    #[test]
    fn test_clear_versus_inherit() {
        let mut edits = HashMap::new();
        let base = base_entry();

        // Base has a tagline, so empty input is an explicit clear
        assert_eq!(
            apply_edit(&mut edits, &base, EditField::Tagline, "  "),
            EditOutcome::Staged
        );
        assert_eq!(edits["item-1"].tagline, FieldEdit::Clear);

        // But clearing a field that is already empty is no edit at all
        let mut bare = base_entry();
        bare.taglines.clear();
        let mut edits = HashMap::new();
        assert_eq!(
            apply_edit(&mut edits, &bare, EditField::Tagline, ""),
            EditOutcome::Reverted
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_bad_date_is_rejected_not_cleared() {
        let mut edits = HashMap::new();
        let base = base_entry();
        assert_eq!(
            apply_edit(&mut edits, &base, EditField::PremiereDate, "next tuesday"),
            EditOutcome::Rejected
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_date_normalization_to_calendar_date() {
        let mut edits = HashMap::new();
        let base = base_entry();
        assert_eq!(
            apply_edit(
                &mut edits,
                &base,
                EditField::PremiereDate,
                "1960-03-05T00:00:00.0000000Z"
            ),
            EditOutcome::Staged
        );
        assert_eq!(
            edits["item-1"].premiere_date,
            FieldEdit::Set(NaiveDate::from_ymd_opt(1960, 3, 5).unwrap())
        );

        // Same date as base, different formatting: no edit
        let mut edits = HashMap::new();
        assert_eq!(
            apply_edit(
                &mut edits,
                &base,
                EditField::PremiereDate,
                "1959-08-17T12:30:00Z"
            ),
            EditOutcome::Reverted
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_bad_year_is_rejected() {
        let mut edits = HashMap::new();
        let base = base_entry();
        assert_eq!(
            apply_edit(&mut edits, &base, EditField::ProductionYear, "MCMLIX"),
            EditOutcome::Rejected
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_effective_view_applies_pending_edits() {
        let mut edits = HashMap::new();
        let base = base_entry();

        apply_edit(&mut edits, &base, EditField::Tagline, "");
        apply_edit(&mut edits, &base, EditField::ProductionYear, "1961");

        let eff = effective(&base, edits.get("item-1"));
        assert_eq!(eff.tagline, None); // cleared
        assert_eq!(eff.production_year, Some(1961)); // set
        assert_eq!(eff.tags, vec!["a", "b"]); // inherited
        assert_eq!(eff.sort_name.as_deref(), Some("so what")); // inherited
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(normalize_tags("a, b; c ,, "), vec!["a", "b", "c"]);
        assert!(normalize_tags("  ").is_empty());
    }
}
