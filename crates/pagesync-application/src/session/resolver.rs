//! One-shot session resolution.

use std::sync::Arc;

use pagesync_core::session::{IdentityGateway, SessionState};
use pagesync_core::{IdentityError, TokenStore};

/// Turns the stored token (if any) into a resolved session.
#[derive(Clone)]
pub struct SessionResolver {
    token_store: Arc<dyn TokenStore>,
    identity: Arc<dyn IdentityGateway>,
}

impl SessionResolver {
    pub fn new(token_store: Arc<dyn TokenStore>, identity: Arc<dyn IdentityGateway>) -> Self {
        Self {
            token_store,
            identity,
        }
    }

    /// Resolves the session. Never fails: every error downgrades to
    /// `Anonymous`.
    ///
    /// - no stored token: `Anonymous`, without any request
    /// - identity rejected or unreachable: `Anonymous`; the stored token is
    ///   left in place, so the next resolution will try it again
    /// - otherwise: `Authenticated` with the returned record
    pub async fn resolve(&self) -> SessionState {
        let Some(token) = self.token_store.get() else {
            tracing::debug!("[SessionResolver] No stored token, session is anonymous");
            return SessionState::Anonymous;
        };

        match self.identity.fetch_identity(&token).await {
            Ok(user) => {
                tracing::info!(
                    "[SessionResolver] Authenticated as {}",
                    user.id().unwrap_or("<no id>")
                );
                SessionState::Authenticated(user)
            }
            Err(IdentityError::Rejected(reason)) => {
                tracing::warn!(
                    "[SessionResolver] Stored token rejected ({}), continuing anonymously",
                    reason
                );
                SessionState::Anonymous
            }
            Err(e) => {
                tracing::warn!("[SessionResolver] Identity lookup failed: {}", e);
                SessionState::Anonymous
            }
        }
    }
}
