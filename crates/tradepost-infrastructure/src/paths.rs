//! Filesystem locations used by the Tradepost client.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/tradepost/         # Config directory
//! ├── config.toml              # ClientConfig
//! ├── session.json             # Persisted session (authUser, access_token)
//! └── logs/                    # Daily rolling logs
//!     └── tradepost.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use tradepost_core::{Result, TradepostError};

const APP_DIR: &str = "tradepost";

/// Resolves every path relative to one config directory.
///
/// `TradepostPaths::new(None)` uses the platform config dir; tests pass a
/// temporary directory.
#[derive(Debug, Clone)]
pub struct TradepostPaths {
    config_dir: PathBuf,
}

impl TradepostPaths {
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let config_dir = match base {
            Some(base) => base.to_path_buf(),
            None => dirs::config_dir()
                .ok_or_else(|| TradepostError::config("Cannot find the user config directory"))?
                .join(APP_DIR),
        };
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join("session.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }
}
