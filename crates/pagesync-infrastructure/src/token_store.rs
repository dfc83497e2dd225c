//! `TokenStore` implementations.
//!
//! - [`FileTokenStore`]: durable, origin-scoped, survives restarts
//! - [`InMemoryTokenStore`]: lives as long as the process

use std::path::Path;
use std::sync::RwLock;

use pagesync_core::error::Result;
use pagesync_core::{PageSyncError, TOKEN_STORAGE_KEY, Token, TokenStore};

use crate::paths::PageSyncPaths;
use crate::storage::OriginStorage;

/// Token store backed by the origin's durable key/value file.
///
/// The token lives under [`TOKEN_STORAGE_KEY`] next to whatever other keys
/// the origin keeps.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    storage: OriginStorage,
}

impl FileTokenStore {
    pub fn new(storage: OriginStorage) -> Self {
        Self { storage }
    }

    /// Opens the store for `origin` under `data_dir`.
    pub fn for_origin(data_dir: &Path, origin: &str) -> Self {
        Self::new(OriginStorage::new(PageSyncPaths::origin_storage_file(
            data_dir, origin,
        )))
    }

    pub fn storage(&self) -> &OriginStorage {
        &self.storage
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<Token> {
        match self.storage.get_item(TOKEN_STORAGE_KEY) {
            Ok(value) => value.filter(|v| !v.is_empty()).map(Token::new),
            Err(e) => {
                tracing::warn!(
                    "[TokenStore] Failed to read token from {}: {}",
                    self.storage.path().display(),
                    e
                );
                None
            }
        }
    }

    fn set(&self, token: Token) -> Result<()> {
        self.storage
            .set_item(TOKEN_STORAGE_KEY, token.expose())
            .map_err(PageSyncError::from)?;
        tracing::debug!("[TokenStore] Token stored");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.storage
            .remove_item(TOKEN_STORAGE_KEY)
            .map_err(PageSyncError::from)?;
        tracing::debug!("[TokenStore] Token cleared");
        Ok(())
    }
}

/// Non-durable token store.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<Token>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self) -> Option<Token> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, token: Token) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| PageSyncError::internal(format!("token lock poisoned: {e}")))?;
        *guard = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| PageSyncError::internal(format!("token lock poisoned: {e}")))?;
        *guard = None;
        Ok(())
    }
}
