//! Process-local image references for unsaved file selections.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pagesync_core::content::{ImageRef, TRANSIENT_SCHEME};
use uuid::Uuid;

use crate::error::ImageSelectionError;

/// Mints `blob:` URIs for files picked in a view and remembers which file
/// each one stands for.
///
/// The mapping dies with the view; nothing here uploads the file bytes.
#[derive(Debug, Default)]
pub struct TransientImages {
    origin: String,
    entries: HashMap<String, PathBuf>,
}

impl TransientImages {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: HashMap::new(),
        }
    }

    /// Registers `file` and returns a fresh transient reference to it.
    pub fn register(&mut self, file: &Path) -> Result<ImageRef, ImageSelectionError> {
        if !file.is_file() {
            return Err(ImageSelectionError::Missing(file.to_path_buf()));
        }

        let mime = mime_guess::from_path(file).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(ImageSelectionError::NotAnImage {
                path: file.to_path_buf(),
                mime: mime.to_string(),
            });
        }

        let uri = format!(
            "{}{}/{}",
            TRANSIENT_SCHEME,
            self.origin.trim_end_matches('/'),
            Uuid::new_v4()
        );
        self.entries.insert(uri.clone(), file.to_path_buf());
        tracing::debug!("[TransientImages] {} -> {}", uri, file.display());
        Ok(ImageRef::Transient(uri))
    }

    /// Local file behind a transient URI, if it is still registered.
    pub fn resolve(&self, uri: &str) -> Option<&Path> {
        self.entries.get(uri).map(PathBuf::as_path)
    }

    pub fn revoke(&mut self, uri: &str) -> bool {
        self.entries.remove(uri).is_some()
    }

    pub fn revoke_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
