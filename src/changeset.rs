//! ChangeSet: the aggregate of uncommitted intentions
//!
//! Everything the operator has asked for but the server has not yet
//! confirmed lives here: at most one staged target order, per-item
//! metadata edits, and at most one import plan. A single `save()`
//! commits the whole set best-effort sequentially; on failure the set is
//! left intact for retry.

use crate::merge::PendingEdit;
use std::collections::HashMap;

/// Which sub-operations of an import are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Append import items missing from the playlist
    pub add_missing: bool,
    /// Remove playlist entries absent from the import
    pub remove_extra: bool,
    /// Reorder the playlist to the import's order
    pub apply_order: bool,
    /// Merge metadata fields mentioned by the import
    pub apply_metadata: bool,
    /// Stage the plan for review instead of executing immediately
    pub dry_run: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            add_missing: true,
            remove_extra: false,
            apply_order: true,
            apply_metadata: false,
            dry_run: true,
        }
    }
}

/// A reconciled import, staged for preview or execution
///
/// The target order is re-derived from `import_order` at save time,
/// because executing the staged adds and removes changes the entry set
/// the reorder plan must operate on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    /// Item ids in the import with no matching playlist occurrence
    pub missing_ids: Vec<String>,
    /// Entry ids present locally but absent from the import
    pub extra_entry_ids: Vec<String>,
    /// Item ids in import file order, for rebuilding the target order
    pub import_order: Vec<String>,
    /// Preview of the resolved target order (entry ids) against the
    /// entries as loaded when the plan was built
    pub preview_order: Vec<String>,
    /// Metadata fields mentioned by the import, keyed by item id
    pub metadata: HashMap<String, crate::import::ImportMetadata>,
    pub options: ImportOptions,
}

impl ImportPlan {
    /// True when executing the plan would issue no calls at all
    pub fn is_noop(&self) -> bool {
        (!self.options.add_missing || self.missing_ids.is_empty())
            && (!self.options.remove_extra || self.extra_entry_ids.is_empty())
            && !self.options.apply_order
            && (!self.options.apply_metadata || self.metadata.is_empty())
    }
}

/// Pending, uncommitted intentions for the editing session
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Staged target order (entry ids), from a sort preview or a
    /// selection move
    pub target_order: Option<Vec<String>>,
    /// Pending metadata edits, keyed by item id
    pub edits: HashMap<String, PendingEdit>,
    /// Staged import plan
    pub import_plan: Option<ImportPlan>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a save would have nothing to do
    pub fn is_empty(&self) -> bool {
        self.target_order.is_none() && self.edits.is_empty() && self.import_plan.is_none()
    }

    /// Drop every staged intention
    pub fn clear(&mut self) {
        self.target_order = None;
        self.edits.clear();
        self.import_plan = None;
    }

    /// Number of items with at least one pending metadata edit
    pub fn edited_item_count(&self) -> usize {
        self.edits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{FieldEdit, PendingEdit};

    #[test]
    fn test_empty_lifecycle() {
        let mut changes = ChangeSet::new();
        assert!(changes.is_empty());

        changes.target_order = Some(vec!["e1".to_string()]);
        assert!(!changes.is_empty());

        changes.clear();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_edits_count_as_pending() {
        let mut changes = ChangeSet::new();
        changes.edits.insert(
            "item-1".to_string(),
            PendingEdit {
                production_year: FieldEdit::Set(1977),
                ..Default::default()
            },
        );
        assert!(!changes.is_empty());
        assert_eq!(changes.edited_item_count(), 1);
    }

    #[test]
    fn test_import_plan_noop_detection() {
        let plan = ImportPlan {
            options: ImportOptions {
                add_missing: true,
                remove_extra: true,
                apply_order: false,
                apply_metadata: false,
                dry_run: true,
            },
            ..Default::default()
        };
        assert!(plan.is_noop());

        let plan = ImportPlan {
            missing_ids: vec!["m1".to_string()],
            options: ImportOptions::default(),
            ..Default::default()
        };
        assert!(!plan.is_noop());
    }
}
