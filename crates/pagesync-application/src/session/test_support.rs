//! Test doubles for the identity gateway.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pagesync_core::session::{IdentityGateway, User};
use pagesync_core::{IdentityError, Token};
use serde_json::Value;

enum Behavior {
    Accept(Value),
    Fail(IdentityError),
    Hang,
}

pub(crate) struct MockIdentity {
    behavior: Behavior,
    calls: AtomicUsize,
    last_token: Mutex<Option<Token>>,
}

impl MockIdentity {
    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    pub(crate) fn accepting(user: Value) -> Self {
        Self::with(Behavior::Accept(user))
    }

    pub(crate) fn failing(error: IdentityError) -> Self {
        Self::with(Behavior::Fail(error))
    }

    /// Never answers.
    pub(crate) fn hanging() -> Self {
        Self::with(Behavior::Hang)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_token(&self) -> Option<Token> {
        self.last_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityGateway for MockIdentity {
    async fn fetch_identity(&self, token: &Token) -> Result<User, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(token.clone());
        match &self.behavior {
            Behavior::Accept(user) => Ok(User::new(user.clone())),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::Hang => std::future::pending().await,
        }
    }
}
