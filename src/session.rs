//! Stateful editing session over one playlist
//!
//! [`PlaylistSession`] owns the server-confirmed entry list (the loader
//! fills it, the executor splices it after each confirmed call) and the
//! [`ChangeSet`] of uncommitted intentions. Every mutating method takes
//! `&mut self`, so two saves can never interleave; all remote calls are
//! issued strictly sequentially because the move endpoint's position
//! semantics are not commutative.

use crate::changeset::{ChangeSet, ImportOptions, ImportPlan};
use crate::client::JellyfinClient;
use crate::config::{Config, DEFAULT_BATCH_SIZE, DEFAULT_MOVE_THROTTLE_MS, DEFAULT_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::import::{self, ExportDocument};
use crate::merge::{self, EditField, EditOutcome, EffectiveMetadata, FieldEdit, PendingEdit};
use crate::models::PlaylistEntry;
use crate::planner;
use std::cmp::Ordering;
use std::time::Duration;

/// Per-session knobs, usually derived from [`Config`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Entries per page request
    pub page_size: usize,
    /// Sleep after each committed move call
    pub move_throttle: Duration,
    /// Ids per chunked add/remove call
    pub batch_size: usize,
    /// Keep fetching pages until the reported total is reached
    pub auto_load_all: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            move_throttle: Duration::from_millis(DEFAULT_MOVE_THROTTLE_MS),
            batch_size: DEFAULT_BATCH_SIZE,
            auto_load_all: true,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.effective_page_size(),
            move_throttle: config.move_throttle(),
            batch_size: config.batch_size,
            auto_load_all: config.auto_load_all,
        }
    }
}

/// Sortable entry fields for order previews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    SortName,
    PremiereDate,
    ProductionYear,
}

/// What a save (or immediate import) actually committed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Items appended to the playlist
    pub added: usize,
    /// Entries removed from the playlist
    pub removed: usize,
    /// Move calls issued
    pub moves: usize,
    /// Item records patched
    pub patched: usize,
}

/// Stateful editing session for one playlist
pub struct PlaylistSession {
    client: JellyfinClient,
    playlist_id: String,
    playlist_name: Option<String>,
    /// Server-confirmed order; an entry's index is its position
    entries: Vec<PlaylistEntry>,
    /// Server-reported entry count, when known
    total: Option<u64>,
    /// Next start index for the loader
    cursor: usize,
    options: SessionOptions,
    changes: ChangeSet,
}

impl PlaylistSession {
    pub fn new(
        client: JellyfinClient,
        playlist_id: impl Into<String>,
        options: SessionOptions,
    ) -> Self {
        Self {
            client,
            playlist_id: playlist_id.into(),
            playlist_name: None,
            entries: Vec::new(),
            total: None,
            cursor: 0,
            options,
            changes: ChangeSet::new(),
        }
    }

    /// Record the playlist's display name (used by exports)
    pub fn set_playlist_name(&mut self, name: impl Into<String>) {
        self.playlist_name = Some(name.into());
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    /// Server-confirmed entries, in order
    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    /// Server-reported total, when known
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Uncommitted intentions staged so far
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// `entries.len() == total` is the sole signal of a complete load;
    /// a partial load must never be treated as complete.
    pub fn is_fully_loaded(&self) -> bool {
        self.total
            .is_some_and(|total| self.entries.len() as u64 == total)
    }

    fn ensure_fully_loaded(&self) -> Result<()> {
        if self.is_fully_loaded() {
            return Ok(());
        }
        Err(Error::NotFullyLoaded {
            loaded: self.entries.len(),
            total: self.total.unwrap_or(0),
        })
    }

    // ========================================================================
    // Paginated loader
    // ========================================================================

    fn reset_entries(&mut self) {
        self.entries.clear();
        self.total = None;
        self.cursor = 0;
    }

    /// Fetch one page at the cursor and append it
    async fn fetch_page(&mut self) -> Result<usize> {
        let page = self
            .client
            .playlist_items(&self.playlist_id, self.cursor, self.options.page_size)
            .await?;

        if page.total_record_count.is_some() {
            self.total = page.total_record_count;
        }

        let count = page.items.len();
        for dto in page.items {
            match PlaylistEntry::from_dto(dto) {
                Some(entry) => self.entries.push(entry),
                None => tracing::warn!("Server returned a playlist item without an id; dropped"),
            }
        }
        self.cursor += count;

        tracing::debug!(
            "Loaded {} entries{}",
            self.entries.len(),
            self.total
                .map(|t| format!(" of {t}"))
                .unwrap_or_default()
        );
        Ok(count)
    }

    /// Load one page. `reset` clears the entry model, the cursor, and
    /// every staged change. A failed request keeps the pages already
    /// accumulated.
    pub async fn load_page(&mut self, reset: bool) -> Result<usize> {
        if reset {
            self.reset_entries();
            self.changes.clear();
        }
        self.fetch_page().await
    }

    /// Load pages until the server-reported total is reached, yielding
    /// between pages so the host event loop is never starved.
    pub async fn load_all(&mut self, reset: bool) -> Result<()> {
        if reset {
            self.reset_entries();
            self.changes.clear();
        }
        loop {
            let count = self.fetch_page().await?;
            let Some(total) = self.total else { break };
            if self.entries.len() as u64 >= total || count == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Reload entries for an in-flight save, preserving staged changes
    async fn refresh_entries(&mut self) -> Result<()> {
        self.reset_entries();
        loop {
            let count = self.fetch_page().await?;
            let Some(total) = self.total else { break };
            if self.entries.len() as u64 >= total || count == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    // ========================================================================
    // Metadata edits
    // ========================================================================

    /// Effective (base overridden by pending edit) metadata for the
    /// entry at `index`
    pub fn effective(&self, index: usize) -> Option<EffectiveMetadata> {
        let entry = self.entries.get(index)?;
        Some(merge::effective(
            entry,
            self.changes.edits.get(&entry.item_id),
        ))
    }

    /// Stage a raw single-field edit for the given item.
    ///
    /// The value is normalized and compared against the base; editing a
    /// field back to its base value removes the pending edit.
    pub fn apply_edit(&mut self, item_id: &str, field: EditField, raw: &str) -> Result<EditOutcome> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.item_id == item_id)
            .cloned()
            .ok_or_else(|| Error::UnknownItem(item_id.to_string()))?;
        Ok(merge::apply_edit(&mut self.changes.edits, &entry, field, raw))
    }

    // ========================================================================
    // Order previews
    // ========================================================================

    /// Sort the loaded entries and stage the result as the target order.
    /// Nothing is sent to the server until `save()`. Returns the
    /// previewed order.
    pub fn sort_preview(&mut self, key: SortKey, ascending: bool) -> Vec<PlaylistEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| compare_entries(key, a, b, ascending));

        let order: Vec<String> = sorted
            .iter()
            .filter_map(|e| e.entry_id.clone())
            .collect();
        if order.len() < sorted.len() {
            tracing::warn!(
                "{} entries have no entry id and will keep drifting positions",
                sorted.len() - order.len()
            );
        }
        self.changes.target_order = Some(order);
        sorted
    }

    /// Stage a selection move: extract the entries at `positions` (in
    /// their displayed relative order) and reinsert them at
    /// `target_index`, clamped to the list.
    ///
    /// Positions index the displayed order: the staged target order if
    /// one is active, the server-confirmed order otherwise.
    pub fn stage_selection_move(&mut self, positions: &[usize], target_index: usize) -> Result<()> {
        if positions.is_empty() {
            return Err(Error::other("nothing selected"));
        }
        let mut list: Vec<String> = match &self.changes.target_order {
            Some(order) => order.clone(),
            None => self
                .entries
                .iter()
                .filter_map(|e| e.entry_id.clone())
                .collect(),
        };

        let mut selected_positions: Vec<usize> = positions.to_vec();
        selected_positions.sort_unstable();
        selected_positions.dedup();
        if let Some(&last) = selected_positions.last() {
            if last >= list.len() {
                return Err(Error::other(format!("position {last} out of range")));
            }
        }

        let selected: Vec<String> = selected_positions.iter().map(|&p| list[p].clone()).collect();
        // Remove bottom-up so earlier indices stay valid
        for &p in selected_positions.iter().rev() {
            list.remove(p);
        }
        let target_index = target_index.min(list.len());
        for (offset, id) in selected.into_iter().enumerate() {
            list.insert(target_index + offset, id);
        }

        self.changes.target_order = Some(list);
        Ok(())
    }

    /// Drop a staged order preview without touching anything else
    pub fn clear_order_preview(&mut self) {
        self.changes.target_order = None;
    }

    // ========================================================================
    // Batch executor
    // ========================================================================

    /// Move one entry to an absolute index, immediately.
    ///
    /// Rejected while an order preview is staged: the preview's
    /// positions would no longer describe the server order.
    pub async fn move_entry(&mut self, current_pos: usize, new_pos: usize) -> Result<()> {
        if self.changes.target_order.is_some() {
            return Err(Error::PreviewActive);
        }
        if new_pos >= self.entries.len() {
            return Err(Error::other(format!("target index {new_pos} out of range")));
        }
        self.raw_move(current_pos, new_pos).await
    }

    /// Move the entry at `pos` one step towards the front; no-op at the edge
    pub async fn move_up(&mut self, pos: usize) -> Result<()> {
        if pos == 0 {
            return Ok(());
        }
        self.move_entry(pos, pos - 1).await
    }

    /// Move the entry at `pos` one step towards the back; no-op at the edge
    pub async fn move_down(&mut self, pos: usize) -> Result<()> {
        if pos + 1 >= self.entries.len() {
            return Ok(());
        }
        self.move_entry(pos, pos + 1).await
    }

    /// Issue one move and splice the local list to match.
    ///
    /// Optimistic by design: no re-fetch after the call. A concurrent
    /// external mutation of the playlist desyncs local state until the
    /// next full reload.
    async fn raw_move(&mut self, current_pos: usize, new_pos: usize) -> Result<()> {
        if current_pos == new_pos {
            return Ok(());
        }
        let entry = self
            .entries
            .get(current_pos)
            .ok_or_else(|| Error::other(format!("position {current_pos} out of range")))?;
        let entry_id = entry
            .entry_id
            .clone()
            .ok_or(Error::MissingEntryId(current_pos))?;

        self.client
            .move_entry(&self.playlist_id, &entry_id, new_pos)
            .await?;

        let entry = self.entries.remove(current_pos);
        let insert_at = new_pos.min(self.entries.len());
        self.entries.insert(insert_at, entry);
        Ok(())
    }

    /// Apply a target order (entry ids) to the server, move by move.
    ///
    /// Clears any staged order preview first, then executes the planned
    /// sequence with the configured throttle after each committed move,
    /// reporting fractional progress after every step.
    pub async fn apply_target_order(
        &mut self,
        target: &[String],
        mut progress: impl FnMut(f32),
    ) -> Result<usize> {
        self.changes.target_order = None;
        self.execute_target_order(target, &mut progress).await
    }

    async fn execute_target_order(
        &mut self,
        target: &[String],
        progress: &mut dyn FnMut(f32),
    ) -> Result<usize> {
        // Entries without an id cannot be addressed; placeholders keep
        // their positions countable without ever matching a target id
        let current: Vec<String> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                e.entry_id
                    .clone()
                    .unwrap_or_else(|| format!("\u{0}unaddressable:{i}"))
            })
            .collect();

        let plan = planner::plan_moves(&current, target);
        let total_moves = plan.len();
        tracing::info!(
            "Applying target order to playlist {}: {} moves",
            self.playlist_id,
            total_moves
        );

        for (index, mv) in plan.iter().enumerate() {
            self.raw_move(mv.from, mv.to).await?;
            if !self.options.move_throttle.is_zero() {
                tokio::time::sleep(self.options.move_throttle).await;
            }
            progress((index + 1) as f32 / total_moves as f32);
        }
        if total_moves == 0 {
            progress(1.0);
        }
        Ok(total_moves)
    }

    /// Append items by id, in chunks of the configured batch size,
    /// strictly sequentially.
    ///
    /// A failed chunk aborts the rest; chunks already sent stay
    /// committed and the error reports how many. The local entry list is
    /// not updated — the server assigns new entry ids, so callers reload
    /// (as `save()` does) before relying on positions.
    pub async fn add_items(&mut self, item_ids: &[String]) -> Result<usize> {
        let total = item_ids.len();
        let mut committed = 0usize;
        for chunk in item_ids.chunks(self.options.batch_size.max(1)) {
            if let Err(source) = self.client.add_items(&self.playlist_id, chunk).await {
                return Err(Error::PartialBatch {
                    committed,
                    total,
                    source: Box::new(source),
                });
            }
            committed += chunk.len();
            tracing::debug!("Added {}/{} items", committed, total);
        }
        Ok(committed)
    }

    /// Remove entries by entry id, in chunks, strictly sequentially.
    /// Confirmed chunks are spliced out of the local list immediately.
    pub async fn remove_entries(&mut self, entry_ids: &[String]) -> Result<usize> {
        let total = entry_ids.len();
        let mut committed = 0usize;
        for chunk in entry_ids.chunks(self.options.batch_size.max(1)) {
            if let Err(source) = self.client.remove_entries(&self.playlist_id, chunk).await {
                return Err(Error::PartialBatch {
                    committed,
                    total,
                    source: Box::new(source),
                });
            }
            let before = self.entries.len();
            self.entries
                .retain(|e| {
                    !e.entry_id
                        .as_deref()
                        .is_some_and(|id| chunk.iter().any(|c| c == id))
                });
            let removed = before - self.entries.len();
            if let Some(total_count) = self.total.as_mut() {
                *total_count = total_count.saturating_sub(removed as u64);
            }
            committed += chunk.len();
            tracing::debug!("Removed {}/{} entries", committed, total);
        }
        Ok(committed)
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Build the export document for the loaded playlist.
    /// Requires a complete load: a partial export would silently lose
    /// the tail of the playlist.
    pub fn export(&self, include_metadata: bool) -> Result<ExportDocument> {
        self.ensure_fully_loaded()?;
        Ok(import::export_document(
            &self.playlist_id,
            self.playlist_name.as_deref().unwrap_or(""),
            &self.entries,
            include_metadata,
            chrono::Utc::now(),
        ))
    }

    /// Reconcile an import payload and stage the resulting plan into the
    /// ChangeSet for review; nothing is sent to the server.
    pub fn stage_import(
        &mut self,
        payload: &serde_json::Value,
        options: ImportOptions,
    ) -> Result<&ImportPlan> {
        self.ensure_fully_loaded()?;
        let items = import::normalize_import(payload)?;
        let options = ImportOptions {
            dry_run: true,
            ..options
        };
        let plan = import::reconcile(&self.entries, &items, options);
        tracing::info!(
            "Staged import: {} to add, {} to remove, {} metadata merges",
            plan.missing_ids.len(),
            plan.extra_entry_ids.len(),
            plan.metadata.len()
        );
        Ok(self.changes.import_plan.insert(plan))
    }

    /// Reconcile an import payload and execute it immediately:
    /// additions, then removals, then (if requested) the reorder, then
    /// metadata merges — in that order, because add/remove change the
    /// entry set the reorder plan operates on.
    pub async fn import_now(
        &mut self,
        payload: &serde_json::Value,
        options: ImportOptions,
        mut progress: impl FnMut(f32),
    ) -> Result<SaveReport> {
        self.ensure_fully_loaded()?;
        let items = import::normalize_import(payload)?;
        let options = ImportOptions {
            dry_run: false,
            ..options
        };
        let plan = import::reconcile(&self.entries, &items, options);

        let (mut report, edits) = self.execute_import_plan(&plan, &mut progress).await?;
        for (item_id, edit) in &edits {
            self.patch_item(item_id, edit).await?;
            report.patched += 1;
        }
        Ok(report)
    }

    /// Execute a plan's add/remove/reorder stages and derive the
    /// metadata edits against the refreshed entries. The edits are
    /// returned rather than applied so that staged saves merge them into
    /// the ChangeSet while immediate imports patch them directly.
    async fn execute_import_plan(
        &mut self,
        plan: &ImportPlan,
        progress: &mut dyn FnMut(f32),
    ) -> Result<(SaveReport, Vec<(String, PendingEdit)>)> {
        let mut report = SaveReport::default();

        if plan.options.add_missing && !plan.missing_ids.is_empty() {
            report.added = self.add_items(&plan.missing_ids).await?;
        }
        if plan.options.remove_extra && !plan.extra_entry_ids.is_empty() {
            report.removed = self.remove_entries(&plan.extra_entry_ids).await?;
        }
        if report.added > 0 || report.removed > 0 {
            // The entry set changed; the reorder must see the real ids
            self.refresh_entries().await?;
        }

        if plan.options.apply_order {
            let target: Vec<String> =
                import::build_target_order(&self.entries, &plan.import_order, plan.options.remove_extra)
                    .into_iter()
                    .filter_map(|e| e.entry_id)
                    .collect();
            report.moves = self.execute_target_order(&target, progress).await?;
        }

        let mut edits = Vec::new();
        if plan.options.apply_metadata {
            for (item_id, meta) in &plan.metadata {
                let Some(entry) = self.entries.iter().find(|e| e.item_id == *item_id) else {
                    tracing::warn!("Import metadata for {} skipped: item not in playlist", item_id);
                    continue;
                };
                if let Some(edit) = import::edit_from_import(entry, meta) {
                    edits.push((item_id.clone(), edit));
                }
            }
        }

        Ok((report, edits))
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Commit every staged intention, best-effort sequentially.
    ///
    /// Order: import plan (adds, removes, reload, reorder), else a
    /// staged sort/selection order, then every pending metadata edit.
    /// The ChangeSet is cleared only after the whole sequence succeeds;
    /// on failure it is left intact so the caller can retry.
    pub async fn save(&mut self, mut progress: impl FnMut(f32)) -> Result<SaveReport> {
        if self.changes.is_empty() {
            return Err(Error::NothingPending);
        }
        let mut report = SaveReport::default();

        if let Some(plan) = self.changes.import_plan.clone() {
            let (plan_report, edits) = self.execute_import_plan(&plan, &mut progress).await?;
            report.added = plan_report.added;
            report.removed = plan_report.removed;
            report.moves = plan_report.moves;
            for (item_id, edit) in edits {
                self.changes
                    .edits
                    .entry(item_id)
                    .or_default()
                    .merge_from(edit);
            }
        } else if let Some(target) = self.changes.target_order.clone() {
            report.moves = self.execute_target_order(&target, &mut progress).await?;
        }

        let pending: Vec<(String, PendingEdit)> = self
            .changes
            .edits
            .iter()
            .map(|(id, edit)| (id.clone(), edit.clone()))
            .collect();
        for (item_id, edit) in &pending {
            self.patch_item(item_id, edit).await?;
            report.patched += 1;
        }

        self.changes.clear();
        tracing::info!(
            "Saved playlist {}: +{} -{} entries, {} moves, {} patches",
            self.playlist_id,
            report.added,
            report.removed,
            report.moves,
            report.patched
        );
        Ok(report)
    }

    /// Read-modify-write one item's metadata: fetch the full record,
    /// patch only the explicitly edited fields, push it back, and sync
    /// the local base so the merge layer stays consistent.
    async fn patch_item(&mut self, item_id: &str, edit: &PendingEdit) -> Result<()> {
        let mut record = self.client.item_record(item_id).await?;
        patch_record(&mut record, edit)?;
        self.client.update_item(item_id, &record).await?;

        for entry in self.entries.iter_mut().filter(|e| e.item_id == item_id) {
            patch_entry(entry, edit);
        }
        Ok(())
    }
}

/// Patch an item record in place. Only fields with an explicit edit are
/// touched; every other field passes through to the update unchanged.
fn patch_record(record: &mut serde_json::Value, edit: &PendingEdit) -> Result<()> {
    use serde_json::{json, Value};

    let object = record
        .as_object_mut()
        .ok_or_else(|| Error::other("item record is not a JSON object"))?;

    match &edit.tags {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => {
            object.insert("Tags".to_string(), json!([]));
        }
        FieldEdit::Set(tags) => {
            object.insert("Tags".to_string(), json!(tags));
        }
    }
    match &edit.tagline {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => {
            object.insert("Taglines".to_string(), json!([]));
        }
        FieldEdit::Set(tagline) => {
            object.insert("Taglines".to_string(), json!([tagline]));
        }
    }
    match &edit.sort_name {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => {
            object.insert("SortName".to_string(), Value::Null);
        }
        FieldEdit::Set(sort_name) => {
            object.insert("SortName".to_string(), json!(sort_name));
        }
    }
    match &edit.premiere_date {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => {
            object.insert("PremiereDate".to_string(), Value::Null);
        }
        FieldEdit::Set(date) => {
            object.insert(
                "PremiereDate".to_string(),
                json!(format!("{}T00:00:00Z", import::format_export_date(*date))),
            );
        }
    }
    match &edit.production_year {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => {
            object.insert("ProductionYear".to_string(), Value::Null);
        }
        FieldEdit::Set(year) => {
            object.insert("ProductionYear".to_string(), json!(year));
        }
    }
    Ok(())
}

/// Sync a local entry's base fields with a confirmed patch
fn patch_entry(entry: &mut PlaylistEntry, edit: &PendingEdit) {
    match &edit.tags {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => entry.tags.clear(),
        FieldEdit::Set(tags) => entry.tags = tags.clone(),
    }
    match &edit.tagline {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => entry.taglines.clear(),
        FieldEdit::Set(tagline) => entry.taglines = vec![tagline.clone()],
    }
    match &edit.sort_name {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => entry.sort_name = None,
        FieldEdit::Set(sort_name) => entry.sort_name = Some(sort_name.clone()),
    }
    match &edit.premiere_date {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => entry.premiere_date = None,
        FieldEdit::Set(date) => entry.premiere_date = Some(*date),
    }
    match &edit.production_year {
        FieldEdit::Inherit => {}
        FieldEdit::Clear => entry.production_year = None,
        FieldEdit::Set(year) => entry.production_year = Some(*year),
    }
}

/// Nulls-last comparison; `ascending` flips values but never null placement
fn compare_values<T: Ord>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            if ascending {
                x.cmp(&y)
            } else {
                y.cmp(&x)
            }
        }
    }
}

fn compare_entries(key: SortKey, a: &PlaylistEntry, b: &PlaylistEntry, ascending: bool) -> Ordering {
    match key {
        SortKey::Name => compare_values(
            Some(a.name.to_lowercase()),
            Some(b.name.to_lowercase()),
            ascending,
        ),
        SortKey::SortName => compare_values(
            a.sort_name.as_ref().map(|s| s.to_lowercase()),
            b.sort_name.as_ref().map(|s| s.to_lowercase()),
            ascending,
        ),
        SortKey::PremiereDate => compare_values(a.premiere_date, b.premiere_date, ascending),
        SortKey::ProductionYear => {
            compare_values(a.production_year, b.production_year, ascending)
        }
    }
}
