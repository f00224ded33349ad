//! Core data model: context items, optimization options, saved groups.

pub mod error;

pub use error::StashError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::next_item_id;

/// What kind of content a [`ContextItem`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// `content` is an absolute file path; text is read externally at use time.
    File,
    /// `content` is the note text itself.
    Text,
}

/// Inclusive, zero-indexed line bounds within a file.
///
/// Deserialization funnels through [`LineRange::new`], so an inverted range
/// in a persisted stash is rejected at load time instead of surfacing later
/// during export or recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLineRange")]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self, StashError> {
        if start > end {
            return Err(StashError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }
}

#[derive(Deserialize)]
struct RawLineRange {
    start: usize,
    end: usize,
}

impl TryFrom<RawLineRange> for LineRange {
    type Error = StashError;

    fn try_from(raw: RawLineRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// One unit of captured context: a whole file, a line range of a file, or a
/// free-form note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextItem {
    /// Unique within a store, stable for the item's lifetime.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Absolute path for file items, literal text for notes.
    pub content: String,
    /// Display name; defaults to the file's base name for file items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Hint for comment-syntax selection in the optimizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<LineRange>,
    /// Cached token estimate; recomputed when settings or content change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,
}

impl ContextItem {
    pub fn file(path: impl Into<String>) -> Self {
        let content = path.into();
        let label = basename(&content).map(str::to_string);
        Self {
            id: next_item_id(),
            kind: ItemKind::File,
            content,
            label,
            language_id: None,
            range: None,
            tokens: None,
        }
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self {
            id: next_item_id(),
            kind: ItemKind::Text,
            content: text.into(),
            label: None,
            language_id: None,
            range: None,
            tokens: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = Some(language_id.into());
        self
    }

    pub fn with_range(mut self, range: LineRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Name shown in listings and export headers.
    pub fn display_label(&self) -> &str {
        if let Some(label) = &self.label {
            return label;
        }
        match self.kind {
            ItemKind::File => basename(&self.content).unwrap_or(&self.content),
            ItemKind::Text => "note",
        }
    }

    /// Two file items pointing at the same path and the same (or both-absent)
    /// range are duplicates. Notes never collide.
    pub fn duplicates(&self, other: &ContextItem) -> bool {
        self.kind == ItemKind::File
            && other.kind == ItemKind::File
            && self.content == other.content
            && self.range == other.range
    }
}

/// Optimization flags applied before token counting and export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizeOptions {
    pub remove_comments: bool,
    pub remove_empty_lines: bool,
}

impl OptimizeOptions {
    pub fn is_identity(&self) -> bool {
        !self.remove_comments && !self.remove_empty_lines
    }
}

/// A named, frozen snapshot of the store's item sequence.
///
/// Items are a structural copy taken at save time; later mutation of the live
/// store never reaches a saved group. `total_tokens` is likewise a historical
/// value computed once from the cached per-item counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGroup {
    pub id: String,
    pub name: String,
    pub items: Vec<ContextItem>,
    pub pinned: bool,
    pub total_tokens: usize,
    pub created_at: DateTime<Utc>,
}

impl SavedGroup {
    pub fn freeze(name: impl Into<String>, items: &[ContextItem]) -> Self {
        Self {
            id: next_item_id(),
            name: name.into(),
            items: items.to_vec(),
            pinned: false,
            total_tokens: items.iter().map(|i| i.tokens.unwrap_or(0)).sum(),
            created_at: Utc::now(),
        }
    }
}

fn basename(path: &str) -> Option<&str> {
    path.rsplit(['/', '\\']).next().filter(|s| !s.is_empty())
}
