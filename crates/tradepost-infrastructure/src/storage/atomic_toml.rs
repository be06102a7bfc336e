//! Atomic TOML file operations.
//!
//! Provides a thin layer for safe concurrent access to TOML configuration files.

use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tradepost_core::Result;

use super::atomic::{FileLock, write_atomically};

/// A handle to a TOML file that is only ever replaced whole.
///
/// - **Atomicity**: tmp file + rename
/// - **Isolation**: `update` holds an exclusive lock across read-modify-write
/// - **Durability**: fsync before rename
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    pub fn save(&self, data: &T) -> Result<()> {
        let toml_string = toml::to_string_pretty(data)?;
        write_atomically(&self.path, toml_string.as_bytes())
    }

    /// Transactional update under an exclusive lock.
    ///
    /// `default_value` is used when the file does not exist yet.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
        T: Clone,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)?;

        Ok(data)
    }
}
