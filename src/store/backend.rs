//! Synchronous key-value storage primitives.
//!
//! Backends keep every entry in memory, so reads never fail. Writes may
//! fail when a backend persists to disk.

use super::error::StoreError;
use super::snapshot::{Snapshot, SnapshotFormat, StoredValue};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// String-keyed storage for booleans and short strings.
pub trait KeyValueStore {
    /// Raw value under `key`, if present.
    fn get(&self, key: &str) -> Option<StoredValue>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError>;

    /// Remove every key in `keys`. Missing keys are ignored.
    fn remove_keys(&mut self, keys: &[String]) -> Result<(), StoreError>;

    /// All keys currently stored, in ascending order.
    fn keys(&self) -> Vec<String>;

    /// Boolean under `key`. A string value reads as absent.
    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(StoredValue::Bool(value)) => Some(value),
            _ => None,
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set(key, StoredValue::Bool(value))
    }

    /// String under `key`. A boolean value reads as absent.
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(StoredValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set(key, StoredValue::Text(value.to_string()))
    }

    fn remove_key(&mut self, key: &str) -> Result<(), StoreError> {
        self.remove_keys(&[key.to_string()])
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Box<K> {
    fn get(&self, key: &str) -> Option<StoredValue> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove_keys(&mut self, keys: &[String]) -> Result<(), StoreError> {
        (**self).remove_keys(keys)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Volatile in-memory backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_keys(&mut self, keys: &[String]) -> Result<(), StoreError> {
        for key in keys {
            self.entries.remove(key);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// File-backed store.
///
/// Entries are mirrored in memory and the whole snapshot is rewritten on
/// every mutation, through a temporary file that is renamed into place.
/// A mutation whose snapshot cannot be written leaves the entries unchanged.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    format: SnapshotFormat,
    entries: BTreeMap<String, StoredValue>,
}

impl FileStore {
    /// Open a store at `path`, loading any existing snapshot.
    ///
    /// A missing or empty file opens as an empty store.
    pub fn open(path: impl Into<PathBuf>, format: SnapshotFormat) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = Self::load(&path, format)?;
        info!(path = %path.display(), entries = entries.len(), "opened file store");
        Ok(Self {
            path,
            format,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    fn load(
        path: &Path,
        format: SnapshotFormat,
    ) -> Result<BTreeMap<String, StoredValue>, StoreError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let bytes = fs::read(path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        Ok(Snapshot::decode(&bytes, format)?.entries)
    }

    /// Write `entries` as the new snapshot.
    ///
    /// The temporary file is removed again when it cannot be renamed into
    /// place.
    fn flush(&self, entries: &BTreeMap<String, StoredValue>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = Snapshot::new(entries.clone()).encode(self.format)?;

        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        fs::write(&temp_path, bytes)?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "stale temp snapshot left behind"
                );
            }
            return Err(e.into());
        }

        debug!(path = %self.path.display(), entries = entries.len(), "flushed snapshot");
        Ok(())
    }

    /// Flush `next` and adopt it only once it is on disk.
    fn commit(&mut self, next: BTreeMap<String, StoredValue>) -> Result<(), StoreError> {
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value);
        self.commit(next)
    }

    fn remove_keys(&mut self, keys: &[String]) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        for key in keys {
            next.remove(key);
        }
        self.commit(next)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
