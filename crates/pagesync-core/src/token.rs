//! Bearer token and the store that owns it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Storage key under which the bearer token is persisted.
///
/// There is exactly one key; every reader and writer goes through it.
pub const TOKEN_STORAGE_KEY: &str = "authToken";

/// Opaque bearer credential.
///
/// The value is never interpreted client-side and `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw credential, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value of an `Authorization` header carrying this token.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Durable storage for the single bearer token.
///
/// Readers (session resolution, fetch, save) only call [`TokenStore::get`];
/// `set` and `clear` belong to whatever login/logout flow sits outside this
/// crate. Expiry is enforced by the backend, not here.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when nothing usable is stored.
    ///
    /// Implementations log and swallow read failures: an unreadable token is
    /// indistinguishable from an absent one for every caller.
    fn get(&self) -> Option<Token>;

    /// Persists `token`, replacing any previous value.
    fn set(&self, token: Token) -> Result<()>;

    /// Removes the stored token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;
}
