//! Namespaced, fail-soft JSON persistence over a [`PrefsStore`].

use std::{collections::BTreeMap, fmt, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::prefs::{MemoryPrefsStore, PrefsStore};

/// Namespace prefix applied to every key written through [`StorageFacade`].
pub const DEFAULT_NAMESPACE: &str = "aegisdesk_";

/// Key-value persistence facade shared by the window manager and apps.
///
/// Values are JSON-encoded and stored under `<namespace><key>`. No operation returns an error:
/// failures are logged and degrade to `false` or the caller's default, because local persistence
/// is best-effort.
///
/// Clones share the same backend.
#[derive(Clone)]
pub struct StorageFacade {
    backend: Rc<dyn PrefsStore>,
    namespace: String,
}

impl fmt::Debug for StorageFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageFacade")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl StorageFacade {
    /// Creates a facade over `backend` using [`DEFAULT_NAMESPACE`].
    pub fn new(backend: impl PrefsStore + 'static) -> Self {
        Self::with_namespace(backend, DEFAULT_NAMESPACE)
    }

    /// Creates a facade over `backend` with an explicit key prefix.
    pub fn with_namespace(backend: impl PrefsStore + 'static, namespace: impl Into<String>) -> Self {
        Self {
            backend: Rc::new(backend),
            namespace: namespace.into(),
        }
    }

    /// Creates a facade over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(MemoryPrefsStore::default())
    }

    /// Returns the key prefix.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.namespace)
    }

    /// Serializes `value` and writes it under `key`. Returns `false` on failure.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                log::error!("storage set error for `{key}`: {err}");
                return false;
            }
        };
        match self.backend.save_pref(&self.full_key(key), &raw) {
            Ok(()) => true,
            Err(err) => {
                log::error!("storage set error for `{key}`: {err}");
                false
            }
        }
    }

    /// Reads and deserializes `key`, returning `default` when missing or undecodable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.try_get(key).unwrap_or(default)
    }

    /// Reads and deserializes `key`, returning `None` when missing or undecodable.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.load_pref(&self.full_key(key)) {
            Ok(raw) => raw?,
            Err(err) => {
                log::error!("storage get error for `{key}`: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::error!("storage get error for `{key}`: {err}");
                None
            }
        }
    }

    /// Removes `key`. Returns `false` on failure.
    pub fn remove(&self, key: &str) -> bool {
        match self.backend.delete_pref(&self.full_key(key)) {
            Ok(()) => true,
            Err(err) => {
                log::error!("storage remove error for `{key}`: {err}");
                false
            }
        }
    }

    /// Removes every key under the namespace, leaving other backend keys untouched.
    pub fn clear(&self) -> bool {
        let keys = match self.backend.pref_keys() {
            Ok(keys) => keys,
            Err(err) => {
                log::error!("storage clear error: {err}");
                return false;
            }
        };
        let mut ok = true;
        for key in keys.iter().filter(|k| k.starts_with(&self.namespace)) {
            if let Err(err) = self.backend.delete_pref(key) {
                log::error!("storage clear error for `{key}`: {err}");
                ok = false;
            }
        }
        ok
    }

    /// Returns every namespaced value keyed by its unprefixed key.
    ///
    /// Entries that fail to decode are reported as `null`.
    pub fn get_all(&self) -> BTreeMap<String, Value> {
        let keys = match self.backend.pref_keys() {
            Ok(keys) => keys,
            Err(err) => {
                log::error!("storage getAll error: {err}");
                return BTreeMap::new();
            }
        };
        keys.iter()
            .filter_map(|full| full.strip_prefix(&self.namespace))
            .map(|key| (key.to_string(), self.get(key, Value::Null)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Thing {
        a: u32,
    }

    struct BrokenStore;

    impl PrefsStore for BrokenStore {
        fn load_pref(&self, _key: &str) -> Result<Option<String>, String> {
            Err("quota".to_string())
        }

        fn save_pref(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
            Err("quota".to_string())
        }

        fn delete_pref(&self, _key: &str) -> Result<(), String> {
            Err("quota".to_string())
        }

        fn pref_keys(&self) -> Result<Vec<String>, String> {
            Err("quota".to_string())
        }
    }

    #[test]
    fn set_then_get_round_trips_structured_value() {
        let storage = StorageFacade::in_memory();
        assert!(storage.set("k", &json!({"a": 1})));
        assert_eq!(storage.get("k", Value::Null), json!({"a": 1}));
        assert_eq!(storage.get("k", Thing { a: 0 }), Thing { a: 1 });
    }

    #[test]
    fn get_missing_key_returns_default() {
        let storage = StorageFacade::in_memory();
        assert_eq!(
            storage.get("missing", "fallback".to_string()),
            "fallback".to_string()
        );
    }

    #[test]
    fn get_undecodable_value_returns_default() {
        let backend = MemoryPrefsStore::default();
        backend.save_pref("aegisdesk_bad", "{oops").expect("seed");
        let storage = StorageFacade::new(backend);
        assert_eq!(storage.get("bad", 7u32), 7);
    }

    #[test]
    fn keys_are_written_under_namespace() {
        let backend = MemoryPrefsStore::default();
        let storage = StorageFacade::new(backend.clone());
        storage.set("tasks", &Vec::<u32>::new());
        assert!(backend.snapshot().contains_key("aegisdesk_tasks"));
    }

    #[test]
    fn clear_only_removes_namespaced_keys() {
        let backend = MemoryPrefsStore::default();
        backend.save_pref("other_app", "1").expect("seed");
        let storage = StorageFacade::new(backend.clone());
        storage.set("one", &1);
        storage.set("two", &2);

        assert!(storage.clear());
        assert_eq!(
            backend.pref_keys().expect("keys"),
            vec!["other_app".to_string()]
        );
    }

    #[test]
    fn get_all_strips_namespace() {
        let storage = StorageFacade::in_memory();
        storage.set("one", &1);
        storage.set("two", &"x");
        let all = storage.get_all();
        assert_eq!(all.get("one"), Some(&json!(1)));
        assert_eq!(all.get("two"), Some(&json!("x")));
    }

    #[test]
    fn backend_failures_degrade_without_errors() {
        let storage = StorageFacade::new(BrokenStore);
        assert!(!storage.set("k", &1));
        assert_eq!(storage.get("k", 5), 5);
        assert!(!storage.remove("k"));
        assert!(!storage.clear());
        assert!(storage.get_all().is_empty());
    }
}
