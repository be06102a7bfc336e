//! Client configuration model (`config.toml`).
//!
//! Loading, defaults on disk and environment overrides live in the
//! infrastructure crate; this is only the shape of the file.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::{DEFAULT_TOKEN_KEY, DEFAULT_USER_KEY, StorageKeys};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every API path is appended to, including the `/api` prefix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// `tracing` filter directive, e.g. `info` or `tradepost=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Also write a daily rolling log under the config directory.
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            log_to_file: false,
            storage: StorageConfig::default(),
        }
    }
}

/// Where and under which keys the session is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Session file. Unset means `session.json` in the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default = "default_user_key")]
    pub user_key: String,
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

impl StorageConfig {
    pub fn keys(&self) -> StorageKeys {
        StorageKeys {
            user_key: self.user_key.clone(),
            token_key: self.token_key.clone(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            user_key: default_user_key(),
            token_key: default_token_key(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_user_key() -> String {
    DEFAULT_USER_KEY.to_string()
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}
