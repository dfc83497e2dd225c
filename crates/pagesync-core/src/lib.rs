//! Domain types and ports for PageSync.
//!
//! The core knows nothing about HTTP or the file system: it defines the
//! session and content models plus the traits (`TokenStore`,
//! `IdentityGateway`, `ContentGateway`) that infrastructure implements.

pub mod content;
pub mod error;
pub mod session;
pub mod token;

// Re-export common types
pub use error::{DocumentError, FetchError, IdentityError, PageSyncError, SaveError};
pub use token::{TOKEN_STORAGE_KEY, Token, TokenStore};
