//! Unified path management for pagesync files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/pagesync/              # Config directory
//! └── config.toml                  # Client configuration
//!
//! ~/.local/share/pagesync/         # Data directory
//! └── storage/                     # Origin-scoped key/value stores
//!     └── http_localhost_5000.toml
//! ```
//!
//! A base directory can be injected (tests, portable installs); it then
//! replaces both the config and the data root.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "pagesync";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves where pagesync keeps its configuration and durable storage.
#[derive(Debug, Clone, Default)]
pub struct PageSyncPaths {
    base: Option<PathBuf>,
}

impl PageSyncPaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g. `~/.config/pagesync/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/pagesync/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the storage file for `origin` under `data_dir`.
    pub fn origin_storage_file(data_dir: &Path, origin: &str) -> PathBuf {
        data_dir
            .join("storage")
            .join(format!("{}.toml", origin_slug(origin)))
    }
}

/// File-name-safe form of an origin such as `http://localhost:5000`.
pub fn origin_slug(origin: &str) -> String {
    let slug: String = origin
        .trim_end_matches('/')
        .replace("://", "_")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();
    if slug.is_empty() {
        "default".to_string()
    } else {
        slug
    }
}
