//! Image references stored in item records.

use serde::{Deserialize, Serialize};

/// URI scheme of process-local references minted for unsaved file selections.
pub const TRANSIENT_SCHEME: &str = "blob:";

/// Where an item's image lives.
///
/// The document only stores the URI string; the variant is recovered from
/// the scheme. Transient references are only meaningful inside the process
/// that minted them and do not survive a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRef {
    /// Backend-relative path such as `Uploads/handshake.jpg`.
    Stable(String),
    /// `blob:` URI pointing at a local file selection.
    Transient(String),
}

impl ImageRef {
    pub fn parse(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        if uri.starts_with(TRANSIENT_SCHEME) {
            ImageRef::Transient(uri)
        } else {
            ImageRef::Stable(uri)
        }
    }

    pub fn as_uri(&self) -> &str {
        match self {
            ImageRef::Stable(uri) | ImageRef::Transient(uri) => uri,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, ImageRef::Transient(_))
    }
}
