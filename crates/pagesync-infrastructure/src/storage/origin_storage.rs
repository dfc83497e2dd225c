//! Origin-scoped durable key/value storage.
//!
//! The on-disk counterpart of browser local storage: one TOML file per
//! backend origin holding a flat `key = "value"` table.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use pagesync_core::PageSyncError;

/// Errors that can occur during origin storage operations.
#[derive(Debug)]
pub enum OriginStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parse error.
    TomlError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for OriginStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OriginStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            OriginStorageError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            OriginStorageError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            OriginStorageError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for OriginStorageError {}

impl From<std::io::Error> for OriginStorageError {
    fn from(e: std::io::Error) -> Self {
        OriginStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for OriginStorageError {
    fn from(e: toml::de::Error) -> Self {
        OriginStorageError::TomlError(e)
    }
}

impl From<toml::ser::Error> for OriginStorageError {
    fn from(e: toml::ser::Error) -> Self {
        OriginStorageError::TomlSerError(e)
    }
}

impl From<OriginStorageError> for PageSyncError {
    fn from(e: OriginStorageError) -> Self {
        match e {
            OriginStorageError::IoError(io) => io.into(),
            OriginStorageError::TomlError(de) => de.into(),
            OriginStorageError::TomlSerError(ser) => ser.into(),
            OriginStorageError::LockError(msg) => PageSyncError::storage(msg),
        }
    }
}

/// Key/value entries persisted for one origin.
///
/// Provides:
/// - **Atomicity**: writes go to a temp file, are fsynced, then renamed
/// - **Isolation**: read-modify-write runs under an exclusive lock file
///
/// A missing or empty file reads as an empty store.
#[derive(Debug, Clone)]
pub struct OriginStorage {
    path: PathBuf,
}

impl OriginStorage {
    /// Creates a handle on the storage file at `path`. Nothing is touched on disk.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads one entry.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, OriginStorageError> {
        Ok(self.load()?.remove(key))
    }

    /// Writes one entry, replacing any previous value.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), OriginStorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    /// Removes one entry. Removing an absent key succeeds.
    pub fn remove_item(&self, key: &str) -> Result<(), OriginStorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    /// Loads all entries.
    pub fn load(&self) -> Result<BTreeMap<String, String>, OriginStorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(toml::from_str(&content)?)
    }

    fn update<F>(&self, f: F) -> Result<(), OriginStorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), OriginStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(entries)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, OriginStorageError> {
        let parent = self.path.parent().ok_or_else(|| {
            OriginStorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;

        let file_name = self.path.file_name().ok_or_else(|| {
            OriginStorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock on `<file>.lock`, released when the handle is dropped.
/// The lock file stays on disk; waiters block on its inode.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, OriginStorageError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| {
                OriginStorageError::LockError(format!("Failed to acquire lock: {}", e))
            })?;
        }

        Ok(FileLock { _file: file })
    }
}
