//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `~/.config/tradepost/config.toml`, creating the
//! file with defaults on first use, then applies environment overrides.

use std::sync::{Arc, RwLock};

use tradepost_core::config::ClientConfig;
use tradepost_core::{Result, TradepostError};

use crate::paths::TradepostPaths;
use crate::storage::AtomicTomlFile;

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "TRADEPOST_API_URL";
/// Overrides `log_level`.
pub const ENV_LOG: &str = "TRADEPOST_LOG";

/// Loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: TradepostPaths,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: TradepostPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn paths(&self) -> &TradepostPaths {
        &self.paths
    }

    /// Returns the configuration, reading the file on first access.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let cached = self
                .config
                .read()
                .map_err(|_| TradepostError::internal("config cache lock poisoned"))?;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load_with(|key| std::env::var(key).ok())?;

        let mut cached = self
            .config
            .write()
            .map_err(|_| TradepostError::internal("config cache lock poisoned"))?;
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on the next `get_config`.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cached) = self.config.write() {
            *cached = None;
        }
    }

    fn load_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
        let file = AtomicTomlFile::<ClientConfig>::new(self.paths.config_file());

        let mut config = match file.load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                // Another process may create the file first; keep theirs.
                let config = file.update(ClientConfig::default(), |_| Ok(()))?;
                tracing::info!(
                    "[Config] Created default config at {}",
                    file.path().display()
                );
                config
            }
            Err(e) => {
                return Err(TradepostError::config(format!(
                    "Failed to load {}: {}",
                    file.path().display(),
                    e
                )));
            }
        };

        apply_env_overrides(&mut config, env);
        Ok(config)
    }
}

fn apply_env_overrides(config: &mut ClientConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(url) = env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("[Config] {} overrides api_base_url", ENV_API_URL);
        config.api_base_url = url;
    }
    if let Some(level) = env(ENV_LOG).filter(|v| !v.trim().is_empty()) {
        config.log_level = level;
    }
}
