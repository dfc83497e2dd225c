//! Errors raised by view-level operations.

use std::path::PathBuf;

use pagesync_core::DocumentError;
use thiserror::Error;

/// A file picked for an image field could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageSelectionError {
    #[error("Selected file does not exist: {0}")]
    Missing(PathBuf),

    #[error("Selected file is not an image ({mime}): {path}")]
    NotAnImage { path: PathBuf, mime: String },
}

/// Failure of an edit made through a [`crate::content::ContentView`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Image(#[from] ImageSelectionError),
}
