//! Error types for PageSync.
//!
//! Each operation that talks to the backend has its own narrow error enum so
//! callers can decide on fallbacks (`IdentityError`, `FetchError`,
//! `SaveError`); document edits fail with `DocumentError`. Everything else
//! (storage, configuration) goes through the shared `PageSyncError`.

use thiserror::Error;

/// A shared error type for storage and configuration concerns.
#[derive(Error, Debug, Clone)]
pub enum PageSyncError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // e.g. "TOML"
        message: String,
    },

    /// Durable storage error (locking, path resolution)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PageSyncError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for PageSyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for PageSyncError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PageSyncError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PageSyncError>`.
pub type Result<T> = std::result::Result<T, PageSyncError>;

/// Why the identity endpoint did not yield a user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The backend answered but refused the token.
    #[error("Identity rejected: {0}")]
    Rejected(String),

    /// The request never produced a response.
    #[error("Identity request failed: {0}")]
    Network(String),

    /// The response body was not a usable identity record.
    #[error("Identity response could not be decoded: {0}")]
    Decode(String),
}

/// Why a section could not be fetched.
///
/// Every variant is recoverable: the caller keeps whatever document it
/// already shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No token is stored, so no request was made.
    #[error("No credential available")]
    NoCredential,

    #[error("Content request failed: {0}")]
    Network(String),

    #[error("Content endpoint returned status {0}")]
    Status(u16),

    /// The response carried no `content` payload.
    #[error("Content response has no content payload")]
    MissingContent,

    #[error("Content response could not be decoded: {0}")]
    Decode(String),
}

/// Why a save did not reach the backend.
///
/// Unlike fetch failures, these are shown to the user: local edits have not
/// been persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("No credential available")]
    NoCredential,

    #[error("Save request failed: {0}")]
    Network(String),

    #[error("Save rejected with status {0}")]
    Rejected(u16),
}

impl SaveError {
    /// Short text suitable for a status line next to the save action.
    pub fn user_message(&self) -> String {
        match self {
            SaveError::NoCredential => "You need to sign in before saving.".to_string(),
            SaveError::Network(_) => {
                "Could not reach the server. Your changes are kept; try saving again.".to_string()
            }
            SaveError::Rejected(status) => {
                format!("The server refused the update ({status}). Your changes are kept.")
            }
        }
    }
}

/// Invalid access into a [`crate::content::ContentDocument`].
///
/// The views only ever address fields they rendered, so any of these
/// indicates a mismatch between the seed document and the server copy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Field '{0}' does not exist in the document")]
    MissingField(String),

    #[error("Field '{0}' is not a collection")]
    NotACollection(String),

    #[error("Field '{0}' is not a scalar")]
    NotAScalar(String),

    #[error("Item {index} of '{collection}' is not a record")]
    NotARecord { collection: String, index: usize },

    #[error("Index {index} is out of range for '{collection}' (len {len})")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },
}
