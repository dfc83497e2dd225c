//! Client configuration.
//!
//! Loaded from `config.toml` in the config directory, then overridden by
//! environment variables:
//!
//! | Variable             | Field                 |
//! |----------------------|-----------------------|
//! | `PAGESYNC_BASE_URL`  | `backend.base_url`    |
//! | `PAGESYNC_LOG_LEVEL` | `logging.level`       |
//! | `PAGESYNC_DATA_DIR`  | `storage.data_dir`    |
//!
//! A missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use pagesync_core::PageSyncError;
use pagesync_core::error::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::paths::PageSyncPaths;

pub const ENV_BASE_URL: &str = "PAGESYNC_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "PAGESYNC_LOG_LEVEL";
pub const ENV_DATA_DIR: &str = "PAGESYNC_DATA_DIR";

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP verb used for the atomic content replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaveMethod {
    #[default]
    Post,
    Put,
}

/// Backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub identity_path: String,
    pub content_path: String,
    pub save_method: SaveMethod,
    /// Per-request timeout. Unset means requests may wait indefinitely,
    /// which leaves a session stuck in `loading` on a hung backend.
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            identity_path: "/identity".to_string(),
            content_path: "/content".to_string(),
            save_method: SaveMethod::Post,
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Root for origin storage files. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `pagesync_application=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Loads `config.toml` from `paths` and applies process environment overrides.
    pub fn load(paths: &PageSyncPaths) -> Result<Self> {
        let file = paths
            .config_file()
            .map_err(|e| PageSyncError::config(e.to_string()))?;
        let config = Self::load_from_file(&file)?.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file; a missing or empty file gives the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("[Config] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Applies overrides from `lookup` (the environment, in production).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            tracing::info!("[Config] {} overrides base URL: {}", ENV_BASE_URL, base_url);
            self.backend.base_url = base_url;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.backend.base_url).map_err(|e| {
            PageSyncError::config(format!(
                "Invalid base URL '{}': {}",
                self.backend.base_url, e
            ))
        })
    }

    /// Origin (`scheme://host:port`) that scopes durable storage.
    pub fn origin(&self) -> Result<String> {
        Ok(self.base_url()?.origin().ascii_serialization())
    }

    /// Directory for origin storage: the configured one, else the platform default.
    pub fn data_dir(&self, paths: &PageSyncPaths) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths
                .data_dir()
                .map_err(|e| PageSyncError::config(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig::load_from_file(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.backend.request_timeout_secs, None);
        assert_eq!(config.origin().unwrap(), "http://localhost:5000");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[backend]
base_url = "https://cms.example.org/api"
save_method = "PUT"
"#,
        )
        .unwrap();

        let config = ClientConfig::load_from_file(&path).unwrap();
        assert_eq!(config.backend.save_method, SaveMethod::Put);
        assert_eq!(config.backend.identity_path, "/identity");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.origin().unwrap(), "https://cms.example.org");
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default().with_overrides(|key| match key {
            ENV_BASE_URL => Some("http://10.0.0.2:8080".to_string()),
            ENV_DATA_DIR => Some("/var/lib/pagesync".to_string()),
            _ => None,
        });
        assert_eq!(config.backend.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/var/lib/pagesync")));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let mut config = ClientConfig::default();
        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_load_with_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.toml"),
            "[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let paths = PageSyncPaths::new(Some(temp_dir.path()));
        let config = ClientConfig::load_from_file(&paths.config_file().unwrap()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.data_dir(&paths).unwrap(), temp_dir.path());
    }
}
