//! Configuration management for d6bridge

pub mod schema;

pub use schema::{CacheBackend, Config};

use crate::error::{BridgeError, BridgeResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("d6bridge")
            .join("config.toml")
    }

    /// Get the state directory path (`D6BRIDGE_STATE_DIR` wins)
    pub fn state_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os("D6BRIDGE_STATE_DIR") {
            return PathBuf::from(dir);
        }
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("d6bridge")
    }

    /// Get the file cache directory path
    pub fn cache_dir() -> PathBuf {
        Self::state_dir().join("cache")
    }

    /// Get the tool call log path
    pub fn audit_log_path() -> PathBuf {
        Self::state_dir().join("calls.log")
    }

    /// Load configuration, creating default if not exists
    pub async fn load(&self) -> BridgeResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load the file, apply process environment overrides, and validate
    pub async fn load_effective(&self) -> BridgeResult<Config> {
        let mut config = self.load().await?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> BridgeResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| BridgeError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| BridgeError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> BridgeResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            BridgeError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> BridgeResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BridgeError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
