use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{ProgressError, ProgressResult};

/// String key-value persistence.
pub trait KeyValueStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> ProgressResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> ProgressResult<()>;

    /// Delete `key`. Returns whether it was present.
    fn remove(&mut self, key: &str) -> ProgressResult<bool>;
}

/// HashMap-backed store for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ProgressResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ProgressResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ProgressResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// A store kept as one JSON object in a file.
///
/// Every write goes to a sibling temp file first and is renamed over the
/// target, so readers never see a half-written file. A missing file reads
/// as an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ProgressResult<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(ProgressError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(ProgressError::NotAnObject(self.path.clone())),
        }
    }

    fn save(&self, map: &Map<String, Value>) -> ProgressResult<()> {
        let content = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ProgressError::Io { path, source }
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        std::fs::write(&tmp, content).map_err(io_err(&tmp))?;
        std::fs::rename(&tmp, &self.path).map_err(io_err(&self.path))?;
        tracing::debug!(path = %self.path.display(), keys = map.len(), "store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> ProgressResult<Option<String>> {
        let map = self.load()?;
        Ok(map.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&mut self, key: &str, value: &str) -> ProgressResult<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&map)
    }

    fn remove(&mut self, key: &str) -> ProgressResult<bool> {
        let mut map = self.load()?;
        let existed = map.remove(key).is_some();
        if existed {
            self.save(&map)?;
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("progress").unwrap().is_none());
        store.set("progress", "{}").unwrap();
        assert_eq!(store.get("progress").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len(), 1);
        assert!(store.remove("progress").unwrap());
        assert!(!store.remove("progress").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.get("anything").unwrap().is_none());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let mut store = JsonFileStore::new(&path);
        store.set("a", "1").unwrap();
        store.set("b", "two").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("two"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/store.json");
        let mut store = JsonFileStore::new(&path);
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("s.json"));
        store.set("k", "v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(store.get("k").unwrap().is_none());
        assert!(!store.remove("k").unwrap());
    }

    #[test]
    fn file_store_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get("k"),
            Err(ProgressError::NotAnObject(_))
        ));
    }

    #[test]
    fn file_store_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get("k"), Err(ProgressError::Json(_))));
    }
}
