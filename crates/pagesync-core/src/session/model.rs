//! User and session state models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity record returned by the backend.
///
/// The client does not interpret the record beyond its existence; the raw
/// JSON is kept as-is so views can show whatever the backend sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Value);

impl User {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Convenience accessor for the conventional `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }
}

/// Tri-state session.
///
/// Within one resolution run the state only moves from `Loading` to one of
/// the resolved states. An explicit override can enter `Authenticated` or
/// `Anonymous` afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Authenticated(User),
    Anonymous,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// State produced by an explicit override (`None` means signed out).
    pub fn from_override(user: Option<User>) -> Self {
        match user {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        }
    }
}

/// What a session context broadcasts to its consumers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Bumped on every published change.
    pub revision: u64,
    /// Set once an explicit override has been applied.
    pub overridden: bool,
}

impl SessionSnapshot {
    pub fn loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }
}
