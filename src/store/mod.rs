//! Key/value persistence for alarms and preferences.
//!
//! Values are strings stored under fixed keys (see [`keys`]). Every `set`
//! writes through immediately; there is no batching and the last writer wins
//! per key. Keys written by other processes are kept.
//!
//! # Implementations
//!
//! - [`FileStore`]: a single JSON object file, replaced atomically on each write
//! - [`MemoryStore`]: in-process map for tests

mod error;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

pub use error::StoreError;

/// File name of the storage file inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Keys under which state is persisted.
pub mod keys {
    /// JSON array of alarms
    pub const ALARMS: &str = "quantumAlarms";
    /// `"24h"` or `"12h"`
    pub const TIME_FORMAT: &str = "timeFormat";
    /// `"true"` or `"false"`
    pub const SMOOTH_MOTION: &str = "smoothMotion";
    /// `"true"` or `"false"`
    pub const SHOW_DIGITAL: &str = "showDigital";
    /// `"dark"` or `"light"`
    pub const THEME: &str = "clockTheme";
    /// `"on"` or `"off"`
    pub const SOUND: &str = "clockSound";
    /// `"on"` or `"off"`
    pub const GLOW: &str = "clockGlow";
}

/// String key/value storage with write-through semantics.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` and persists it before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// Storage backed by one JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or prepares to create) the storage file at `path`.
    ///
    /// The parent directory is created if missing. A missing file is treated
    /// as empty storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the file cannot
    /// be read, or its content is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::WriteFailed(format!("{}: {}", parent.display(), e))
            })?;
        }

        let entries = read_entries(&path)?;

        debug!("Opened storage {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Opens `storage.json` inside `data_dir`.
    ///
    /// # Errors
    ///
    /// See [`FileStore::open`].
    pub fn open_in(data_dir: &Path) -> Result<Self, StoreError> {
        Self::open(data_dir.join(STORAGE_FILE_NAME))
    }

    /// Returns the path of the storage file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;

        // Replace via rename so a crash never leaves a half-written file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;

        Ok(())
    }
}

/// Reads the storage file; a missing or blank file is empty storage.
fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| StoreError::ReadFailed(format!("{}: {}", path.display(), e)))?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content)
        .map_err(|e| StoreError::Corrupted(format!("{}: {}", path.display(), e)))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        // Other processes may have written since open; merge into their state
        let mut merged = read_entries(&self.path)?;
        merged.insert(key.to_string(), value.to_string());
        self.write_all(&merged)?;
        *entries = merged;
        debug!("Persisted key '{}'", key);
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory storage for testing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    should_fail: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.lock().unwrap();
            for (key, value) in entries {
                map.insert(key.to_string(), value.to_string());
            }
        }
        store
    }

    /// Makes subsequent writes fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns the number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed("Mock failure".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
