//! Key/value persistence collaborator.
//!
//! The store never talks to disk directly; it hands JSON values to this
//! interface under fixed keys. The bundled [`JsonFileStore`] keeps everything
//! in one JSON object written back on every update.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::StashError;

/// Key for the live item sequence.
pub const ITEMS_KEY: &str = "contextItems";
/// Key for the saved-group list.
pub const GROUPS_KEY: &str = "savedGroups";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn update(&mut self, key: &str, value: Value) -> Result<(), StashError>;
}

/// Single-file JSON store. A missing file starts empty; a corrupt file is a
/// persistence error rather than silent data loss.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StashError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| StashError::Persist(format!("reading {}: {e}", path.display())))?;
            serde_json::from_str(&raw)
                .map_err(|e| StashError::Persist(format!("parsing {}: {e}", path.display())))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Write to a sibling temp file and rename over the target, so a crash
    /// mid-write cannot truncate the stash.
    fn flush(&self) -> Result<(), StashError> {
        let rendered = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StashError::Persist(e.to_string()))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, rendered)
            .map_err(|e| StashError::Persist(format!("writing {}: {e}", staging.display())))?;
        fs::rename(&staging, &self.path)
            .map_err(|e| StashError::Persist(format!("replacing {}: {e}", self.path.display())))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: Value) -> Result<(), StashError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: Value) -> Result<(), StashError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_through_file() {
        let dir = TempDir::new().expect("tmp dir");
        let path = dir.path().join("stash.json");

        let mut store = JsonFileStore::open(&path).expect("open");
        store
            .update(ITEMS_KEY, serde_json::json!([{"id": "x"}]))
            .expect("update");

        let reopened = JsonFileStore::open(&path).expect("reopen");
        let value = reopened.get(ITEMS_KEY).expect("value present");
        assert_eq!(value[0]["id"], "x");
    }

    #[test]
    fn update_replaces_file_without_leaving_staging() {
        let dir = TempDir::new().expect("tmp dir");
        let path = dir.path().join("stash.json");

        let mut store = JsonFileStore::open(&path).expect("open");
        store.update(ITEMS_KEY, serde_json::json!([])).expect("first update");
        store.update(ITEMS_KEY, serde_json::json!([{"id": "y"}])).expect("second update");

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let reopened = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get(ITEMS_KEY).expect("value")[0]["id"], "y");
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().expect("tmp dir");
        let store = JsonFileStore::open(dir.path().join("none.json")).expect("open");
        assert!(store.get(ITEMS_KEY).is_none());
    }

    #[test]
    fn corrupt_file_is_a_persist_error() {
        let dir = TempDir::new().expect("tmp dir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").expect("write");
        assert!(JsonFileStore::open(&path).is_err());
    }
}
