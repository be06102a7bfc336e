//! Durable key-value persistence interface.
//!
//! The session layer never touches files or browser storage directly; it is
//! handed a [`KeyValueStore`] so tests can swap in an in-memory map.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Result, TradepostError};

/// Default key for the serialized identity blob.
pub const DEFAULT_USER_KEY: &str = "authUser";
/// Default key for the raw bearer token.
pub const DEFAULT_TOKEN_KEY: &str = "access_token";

/// String-valued persistent storage.
///
/// # Implementation Notes
///
/// `remove` on a missing key is not an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads and decodes a JSON entry.
    ///
    /// Undecodable content is reported as `MalformedPersistedData` so the
    /// caller can discard it.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| TradepostError::malformed(key, e.to_string())),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// The two entries that make up a persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub user_key: String,
    pub token_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            user_key: DEFAULT_USER_KEY.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}
