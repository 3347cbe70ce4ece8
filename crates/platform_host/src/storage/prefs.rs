//! Raw key-value backends that hold JSON text per key.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

/// Host service for persisted text values keyed by string.
///
/// Implementations are synchronous, mirroring browser `localStorage`. Errors are reported as
/// strings and are expected to be swallowed (and logged) by [`crate::StorageFacade`].
pub trait PrefsStore {
    /// Loads the raw text stored under `key`.
    fn load_pref(&self, key: &str) -> Result<Option<String>, String>;

    /// Stores `raw_json` under `key`, replacing any previous value.
    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Deletes `key`. Deleting a missing key succeeds.
    fn delete_pref(&self, key: &str) -> Result<(), String>;

    /// Lists every key currently present in the store.
    fn pref_keys(&self) -> Result<Vec<String>, String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save_pref(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete_pref(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }

    fn pref_keys(&self) -> Result<Vec<String>, String> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store. Clones share the same underlying map.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns a copy of the raw contents, keyed by full (prefixed) key.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.borrow().clone()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }

    fn pref_keys(&self) -> Result<Vec<String>, String> {
        Ok(self.inner.borrow().keys().cloned().collect())
    }
}

#[derive(Debug, Clone)]
/// Store backed by a single JSON object file on disk.
///
/// Every operation re-reads the file and writes it back in full, so two processes sharing a file
/// race with last-write-wins semantics.
pub struct FilePrefsStore {
    path: PathBuf,
}

impl FilePrefsStore {
    /// Creates a store rooted at `path`. The file is created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new())
            }
            Err(err) => return Err(format!("read {} failed: {err}", self.path.display())),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|err| format!("parse {} failed: {err}", self.path.display()))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| format!("create {} failed: {err}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(map).map_err(|err| err.to_string())?;
        fs::write(&self.path, raw)
            .map_err(|err| format!("write {} failed: {err}", self.path.display()))
    }
}

impl PrefsStore for FilePrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.read_map()?.remove(key))
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), raw_json.to_string());
        self.write_map(&map)
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn pref_keys(&self) -> Result<Vec<String>, String> {
        Ok(self.read_map()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_prefs_store_round_trip_and_delete() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsStore = &store;

        store_obj.save_pref("pref.key", "{\"k\":1}").expect("save");
        assert_eq!(
            store_obj.load_pref("pref.key").expect("load"),
            Some("{\"k\":1}".to_string())
        );
        store_obj.delete_pref("pref.key").expect("delete");
        assert_eq!(store_obj.load_pref("pref.key").expect("load"), None);
    }

    #[test]
    fn memory_prefs_store_clones_share_contents() {
        let store = MemoryPrefsStore::default();
        let other = store.clone();
        store.save_pref("a", "1").expect("save");
        assert_eq!(other.pref_keys().expect("keys"), vec!["a".to_string()]);
    }

    #[test]
    fn noop_prefs_store_is_empty_and_successful() {
        let store = NoopPrefsStore;
        assert_eq!(store.load_pref("k").expect("load"), None);
        store.save_pref("k", "{}").expect("save");
        store.delete_pref("k").expect("delete");
        assert!(store.pref_keys().expect("keys").is_empty());
    }

    #[test]
    fn file_prefs_store_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("prefs.json");

        FilePrefsStore::new(&path)
            .save_pref("aegisdesk_tasks", "[]")
            .expect("save");
        let reopened = FilePrefsStore::new(&path);
        assert_eq!(
            reopened.load_pref("aegisdesk_tasks").expect("load"),
            Some("[]".to_string())
        );

        reopened.delete_pref("aegisdesk_tasks").expect("delete");
        assert!(reopened.pref_keys().expect("keys").is_empty());
    }

    #[test]
    fn file_prefs_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").expect("write");

        let err = FilePrefsStore::new(&path)
            .load_pref("k")
            .expect_err("corrupt file should fail");
        assert!(err.contains("parse"));
    }
}
