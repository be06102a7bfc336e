//! File-backed key-value store.
//!
//! All entries live in one JSON object (`{"authUser": "...", "access_token":
//! "..."}`). Every mutation rewrites the file atomically while holding an
//! exclusive lock.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tradepost_core::storage::KeyValueStore;
use tradepost_core::{Result, TradepostError};

use super::atomic::{FileLock, write_atomically};

type Entries = BTreeMap<String, String>;

pub struct JsonFileKeyValueStore {
    path: PathBuf,
}

impl JsonFileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn load(&self, key: &str) -> Result<Entries> {
        match self.read_raw()? {
            Some(content) => serde_json::from_str(&content).map_err(|e| {
                TradepostError::malformed(
                    key,
                    format!("{} is not a JSON string map: {}", self.path.display(), e),
                )
            }),
            None => Ok(Entries::new()),
        }
    }

    /// Read-modify-write under the lock. A corrupt file is replaced.
    fn mutate(&self, f: impl FnOnce(&mut Entries)) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;

        let mut entries = match self.read_raw()? {
            Some(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(
                    "[Storage] Replacing unreadable store {}: {}",
                    self.path.display(),
                    e
                );
                Entries::new()
            }),
            None => Entries::new(),
        };

        f(&mut entries);

        let serialized = serde_json::to_string_pretty(&entries)?;
        write_atomically(&self.path, serialized.as_bytes())
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load(key)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }
}
