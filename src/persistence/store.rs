//! Key-value persistence
//!
//! Every durable record in the game is a single value under a fixed key.
//! A missing key is a first run, not an error.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::Value;

use crate::core::error::Result;

pub const MONEY_KEY: &str = "PlayerMoney";
pub const INVENTORY_KEY: &str = "PlayerInventory";
pub const LAST_LOGIN_KEY: &str = "LastLoginTime";
pub const BEST_SCORE_KEY: &str = "GardenBestScore";
pub const TOTAL_EARNED_KEY: &str = "GardenTotalEarned";

/// Durable key-value storage backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn remove(&mut self, key: &str) -> bool;

    /// Make every pending write durable
    fn flush(&mut self) -> Result<()>;

    fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_owned))
    }
}

/// Map-backed store, optionally mirrored to a JSON file on flush
#[derive(Debug, Default)]
pub struct PrefsStore {
    values: BTreeMap<String, Value>,
    path: Option<PathBuf>,
}

impl PrefsStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store
    ///
    /// A missing file yields an empty store. A file that cannot be parsed is
    /// reported so the caller can decide whether to start fresh.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            tracing::debug!("No save file at {}, starting fresh", path.display());
            BTreeMap::new()
        };
        Ok(Self { values, path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for PrefsStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&self.values)?;
            fs::write(path, json)?;
        }
        Ok(())
    }
}

/// Shared handle to the single store used by every persisted component
///
/// The simulation runs on one thread, so interior mutability through
/// `RefCell` is enough; no borrow is ever held across a call out of this
/// module.
#[derive(Clone)]
pub struct SharedStore(Rc<RefCell<dyn KeyValueStore>>);

impl SharedStore {
    pub fn new<S: KeyValueStore + 'static>(store: S) -> Self {
        Self(Rc::new(RefCell::new(store)))
    }

    pub fn in_memory() -> Self {
        Self::new(PrefsStore::in_memory())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.0.borrow().get_int(key)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.0.borrow().get_string(key)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.0.borrow().has_key(key)
    }

    /// Write a value and flush immediately
    ///
    /// Failures are logged and swallowed: a failed save never aborts the
    /// game action that triggered it.
    pub fn put(&self, key: &str, value: Value) -> bool {
        let mut store = self.0.borrow_mut();
        store.set(key, value);
        match store.flush() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to persist {}: {}", key, e);
                false
            }
        }
    }

    /// Remove a key and flush
    pub fn delete(&self, key: &str) -> bool {
        let mut store = self.0.borrow_mut();
        let existed = store.remove(key);
        if let Err(e) = store.flush() {
            tracing::error!("Failed to persist removal of {}: {}", key, e);
        }
        existed
    }

    pub fn flush(&self) -> Result<()> {
        self.0.borrow_mut().flush()
    }
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pet_haven_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_in_memory_roundtrip() {
        let store = SharedStore::in_memory();
        assert!(!store.has_key(MONEY_KEY));

        assert!(store.put(MONEY_KEY, json!(120)));
        assert_eq!(store.get_int(MONEY_KEY), Some(120));

        assert!(store.delete(MONEY_KEY));
        assert!(!store.delete(MONEY_KEY));
        assert_eq!(store.get_int(MONEY_KEY), None);
    }

    #[test]
    fn test_typed_getters_reject_wrong_type() {
        let store = SharedStore::in_memory();
        store.put(LAST_LOGIN_KEY, json!("yesterday"));
        assert_eq!(store.get_int(LAST_LOGIN_KEY), None);
        assert_eq!(store.get_string(LAST_LOGIN_KEY).as_deref(), Some("yesterday"));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);

        {
            let store = SharedStore::new(PrefsStore::open(&path).unwrap());
            store.put(MONEY_KEY, json!(42));
        }

        let reopened = PrefsStore::open(&path).unwrap();
        assert_eq!(reopened.get_int(MONEY_KEY), Some(42));
        assert_eq!(reopened.path(), Some(path.as_path()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let store = PrefsStore::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        assert!(PrefsStore::open(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
