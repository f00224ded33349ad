//! The Context Store: the ordered working set of context items.
//!
//! Owns the live `ContextItem` sequence, enforces file-item dedup, persists
//! every mutation through the key/value collaborator, and keeps cached token
//! counts in step with the optimization settings.

pub mod persist;

pub use persist::{JsonFileStore, KeyValueStore, MemoryStore, GROUPS_KEY, ITEMS_KEY};

use crate::domain::{ContextItem, ItemKind, OptimizeOptions, SavedGroup, StashError};
use crate::optimize::optimize;
use crate::source::FileReader;
use crate::tokens::TokenEstimator;

type Observer = Box<dyn Fn(&[ContextItem])>;

pub struct ContextStore {
    items: Vec<ContextItem>,
    options: OptimizeOptions,
    kv: Box<dyn KeyValueStore>,
    estimator: TokenEstimator,
    observers: Vec<Observer>,
}

impl ContextStore {
    /// Open a store over the given persistence collaborator, restoring any
    /// previously saved item sequence.
    pub fn open(
        kv: Box<dyn KeyValueStore>,
        estimator: TokenEstimator,
        options: OptimizeOptions,
    ) -> Result<Self, StashError> {
        let items = match kv.get(ITEMS_KEY) {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| StashError::Persist(format!("decoding {ITEMS_KEY}: {e}")))?,
            None => Vec::new(),
        };
        Ok(Self { items, options, kv, estimator, observers: Vec::new() })
    }

    pub fn items(&self) -> &[ContextItem] {
        &self.items
    }

    pub fn options(&self) -> OptimizeOptions {
        self.options
    }

    /// Register a callback invoked with the new item slice after every
    /// mutating operation.
    pub fn subscribe(&mut self, observer: impl Fn(&[ContextItem]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Change optimization settings. Invalidates every cached token count,
    /// since counts are computed over optimized text.
    pub fn set_options(&mut self, options: OptimizeOptions) -> Result<(), StashError> {
        if options == self.options {
            return Ok(());
        }
        self.options = options;
        for item in &mut self.items {
            item.tokens = None;
        }
        self.commit()
    }

    /// Append an item. A file item whose path and range match an existing file
    /// item is rejected as a duplicate (returns `Ok(false)`, no mutation).
    /// Text items always append.
    pub fn add(&mut self, item: ContextItem) -> Result<bool, StashError> {
        if self.items.iter().any(|existing| existing.duplicates(&item)) {
            tracing::debug!(path = %item.content, "duplicate file item rejected");
            return Ok(false);
        }
        self.items.push(item);
        self.commit()?;
        Ok(true)
    }

    /// Create a note with a freshly estimated token count. Returns its id.
    pub fn add_note(&mut self, text: impl Into<String>) -> Result<String, StashError> {
        let mut note = ContextItem::note(text);
        note.tokens = Some(self.estimate(&note.content, None));
        let id = note.id.clone();
        self.items.push(note);
        self.commit()?;
        Ok(id)
    }

    /// Remove by id; a missing id is a silent no-op.
    pub fn remove(&mut self, id: &str) -> Result<(), StashError> {
        self.remove_many(&[id.to_string()])
    }

    pub fn remove_many(&mut self, ids: &[String]) -> Result<(), StashError> {
        let before = self.items.len();
        self.items.retain(|item| !ids.contains(&item.id));
        if self.items.len() == before {
            return Ok(());
        }
        self.commit()
    }

    /// Full-replacement reorder: the sequence becomes the items looked up in
    /// `ids_in_new_order`. Unknown ids are skipped, and items whose id is
    /// omitted from the list are dropped, not appended back.
    ///
    /// Items are moved out of the old sequence as they are consumed, so a
    /// repeated id places its item once and cannot duplicate it.
    pub fn reorder(&mut self, ids_in_new_order: &[String]) -> Result<(), StashError> {
        let mut remaining = std::mem::take(&mut self.items);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in ids_in_new_order {
            if let Some(position) = remaining.iter().position(|item| &item.id == id) {
                reordered.push(remaining.remove(position));
            }
        }
        self.items = reordered;
        self.commit()
    }

    pub fn clear(&mut self) -> Result<(), StashError> {
        self.items.clear();
        self.commit()
    }

    /// Bulk replace, used to restore a saved group.
    pub fn load(&mut self, items: Vec<ContextItem>) -> Result<(), StashError> {
        self.items = items;
        self.commit()
    }

    /// Re-derive every item's token count under the current settings, reading
    /// file content through `reader`. One unreadable file is logged and its
    /// previous count kept; the other items still recalculate.
    pub fn recalculate_tokens(&mut self, reader: &dyn FileReader) -> Result<(), StashError> {
        for item in &mut self.items {
            let text = match item.kind {
                ItemKind::File => match reader.read(&item.content, item.range) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(path = %item.content, error = %e, "token recalculation skipped");
                        continue;
                    }
                },
                ItemKind::Text => item.content.clone(),
            };
            let optimized = optimize(&text, item.language_id.as_deref(), self.options);
            item.tokens = Some(self.estimator.estimate(&optimized));
        }
        self.commit()
    }

    /// Sum of cached token counts (uncounted items contribute 0).
    pub fn total_tokens(&self) -> usize {
        self.items.iter().map(|item| item.tokens.unwrap_or(0)).sum()
    }

    // ── Saved groups ────────────────────────────────────────────────────────

    /// All saved groups, pinned first, then newest first.
    pub fn groups(&self) -> Vec<SavedGroup> {
        let mut groups = self.read_groups();
        groups.sort_by(|a, b| {
            b.pinned.cmp(&a.pinned).then_with(|| b.created_at.cmp(&a.created_at))
        });
        groups
    }

    /// Freeze the current item sequence under `name`. The group owns a
    /// structural copy; later store mutation does not reach it.
    pub fn save_group(&mut self, name: impl Into<String>) -> Result<SavedGroup, StashError> {
        let group = SavedGroup::freeze(name, &self.items);
        let mut groups = self.read_groups();
        groups.push(group.clone());
        self.write_groups(&groups)?;
        Ok(group)
    }

    /// Delete by id; a missing id is a silent no-op.
    pub fn delete_group(&mut self, id: &str) -> Result<(), StashError> {
        let mut groups = self.read_groups();
        let before = groups.len();
        groups.retain(|group| group.id != id);
        if groups.len() == before {
            return Ok(());
        }
        self.write_groups(&groups)
    }

    /// Toggle the pin flag, the only field mutable after creation. Returns the
    /// new state.
    pub fn toggle_pin(&mut self, id: &str) -> Result<bool, StashError> {
        let mut groups = self.read_groups();
        let group = groups
            .iter_mut()
            .find(|group| group.id == id)
            .ok_or_else(|| StashError::GroupNotFound(id.to_string()))?;
        group.pinned = !group.pinned;
        let pinned = group.pinned;
        self.write_groups(&groups)?;
        Ok(pinned)
    }

    /// Replace the live sequence with a copy of the group's items.
    pub fn restore_group(&mut self, id: &str) -> Result<(), StashError> {
        let group = self
            .read_groups()
            .into_iter()
            .find(|group| group.id == id)
            .ok_or_else(|| StashError::GroupNotFound(id.to_string()))?;
        self.load(group.items)
    }

    // ── internals ───────────────────────────────────────────────────────────

    fn estimate(&self, text: &str, language_id: Option<&str>) -> usize {
        let optimized = optimize(text, language_id, self.options);
        self.estimator.estimate(&optimized)
    }

    fn commit(&mut self) -> Result<(), StashError> {
        let value = serde_json::to_value(&self.items)
            .map_err(|e| StashError::Persist(e.to_string()))?;
        self.kv.update(ITEMS_KEY, value)?;
        for observer in &self.observers {
            observer(&self.items);
        }
        Ok(())
    }

    fn read_groups(&self) -> Vec<SavedGroup> {
        match self.kv.get(GROUPS_KEY) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "saved groups unreadable, treating as empty");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    fn write_groups(&mut self, groups: &[SavedGroup]) -> Result<(), StashError> {
        let value =
            serde_json::to_value(groups).map_err(|e| StashError::Persist(e.to_string()))?;
        self.kv.update(GROUPS_KEY, value)
    }
}
