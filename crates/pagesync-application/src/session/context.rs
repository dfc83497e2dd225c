//! Application-lifetime session state.
//!
//! A [`SessionContext`] is created once at start-up and handed to every view
//! that needs session data. It resolves the session once, on mount, and
//! publishes each change through a `watch` channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pagesync_core::session::{SessionSnapshot, SessionState, User};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::resolver::SessionResolver;

struct ContextInner {
    resolver: SessionResolver,
    sender: watch::Sender<SessionSnapshot>,
    mounted: AtomicBool,
    disposed: AtomicBool,
}

impl ContextInner {
    /// Publishes a resolver result unless the context was torn down or a
    /// consumer already overrode the user.
    fn apply_resolution(&self, state: SessionState) {
        if self.disposed.load(Ordering::SeqCst) {
            tracing::debug!("[SessionContext] Resolution finished after dispose, ignored");
            return;
        }

        let applied = self.sender.send_if_modified(|snapshot| {
            if snapshot.overridden {
                return false;
            }
            snapshot.state = state;
            snapshot.revision += 1;
            true
        });

        if !applied {
            tracing::debug!("[SessionContext] Resolution superseded by explicit override");
        }
    }
}

/// Cheaply clonable handle on the shared session state.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<ContextInner>,
}

impl SessionContext {
    /// Creates an unmounted context in the `Loading` state.
    pub fn new(resolver: SessionResolver) -> Self {
        let (sender, _receiver) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(ContextInner {
                resolver,
                sender,
                mounted: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// Starts the single session resolution on the current tokio runtime.
    ///
    /// Only the first call does anything; later calls return `None`. There
    /// is no timeout or retry: if the identity request never completes the
    /// context stays `loading`.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            tracing::warn!("[SessionContext] Already mounted, not resolving again");
            return None;
        }

        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            let state = inner.resolver.resolve().await;
            inner.apply_resolution(state);
        }))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.sender.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.sender.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.inner.sender.borrow().loading()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.sender.borrow().user().cloned()
    }

    /// Overwrites the resolved user, e.g. right after a login flow stored a
    /// new token. `None` marks the session anonymous.
    pub fn set_user(&self, user: Option<User>) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            tracing::debug!("[SessionContext] set_user after dispose, ignored");
            return;
        }

        self.inner.sender.send_modify(|snapshot| {
            snapshot.state = SessionState::from_override(user);
            snapshot.overridden = true;
            snapshot.revision += 1;
        });
    }

    /// Tears the context down. A resolution still in flight completes but
    /// its result is dropped.
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::MockIdentity;
    use pagesync_core::{IdentityError, Token, TokenStore};
    use pagesync_infrastructure::InMemoryTokenStore;
    use serde_json::json;
    use std::time::Duration;

    fn context(store: InMemoryTokenStore, identity: Arc<MockIdentity>) -> SessionContext {
        SessionContext::new(SessionResolver::new(Arc::new(store), identity))
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let ctx = context(
            InMemoryTokenStore::new(),
            Arc::new(MockIdentity::accepting(json!({"id": "u1"}))),
        );
        assert!(ctx.loading());
        assert!(ctx.user().is_none());
    }

    #[tokio::test]
    async fn test_no_token_resolves_anonymous_without_request() {
        let identity = Arc::new(MockIdentity::accepting(json!({"id": "u1"})));
        let ctx = context(InMemoryTokenStore::new(), identity.clone());

        ctx.mount().unwrap().await.unwrap();

        assert!(!ctx.loading());
        assert!(ctx.user().is_none());
        assert_eq!(ctx.snapshot().state, SessionState::Anonymous);
        assert_eq!(identity.calls(), 0);
    }

    #[tokio::test]
    async fn test_token_resolves_authenticated() {
        let identity = Arc::new(MockIdentity::accepting(json!({"id": "u1"})));
        let ctx = context(InMemoryTokenStore::with_token(Token::new("t")), identity);

        ctx.mount().unwrap().await.unwrap();

        assert!(!ctx.loading());
        assert_eq!(ctx.user(), Some(User::new(json!({"id": "u1"}))));
    }

    #[tokio::test]
    async fn test_mount_runs_once() {
        let identity = Arc::new(MockIdentity::accepting(json!({"id": "u1"})));
        let ctx = context(
            InMemoryTokenStore::with_token(Token::new("t")),
            identity.clone(),
        );

        ctx.mount().unwrap().await.unwrap();
        assert!(ctx.mount().is_none());
        assert_eq!(identity.calls(), 1);
    }

    #[tokio::test]
    async fn test_rejected_token_stays_stored() {
        let store = Arc::new(InMemoryTokenStore::with_token(Token::new("stale")));
        let identity = Arc::new(MockIdentity::failing(IdentityError::Rejected(
            "expired".into(),
        )));
        let ctx = SessionContext::new(SessionResolver::new(store.clone(), identity));

        ctx.mount().unwrap().await.unwrap();

        assert_eq!(ctx.snapshot().state, SessionState::Anonymous);
        assert_eq!(store.get(), Some(Token::new("stale")));
    }

    #[tokio::test]
    async fn test_subscribers_see_resolution() {
        let ctx = context(
            InMemoryTokenStore::with_token(Token::new("t")),
            Arc::new(MockIdentity::accepting(json!({"id": "u1"}))),
        );
        let mut receiver = ctx.subscribe();

        let handle = ctx.mount().unwrap();
        receiver.changed().await.unwrap();

        let snapshot = receiver.borrow_and_update().clone();
        assert!(!snapshot.loading());
        assert_eq!(snapshot.user().and_then(|u| u.id()), Some("u1"));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_override_after_resolution() {
        let ctx = context(InMemoryTokenStore::new(), Arc::new(MockIdentity::hanging()));
        ctx.mount().unwrap().await.unwrap();
        assert!(ctx.user().is_none());

        ctx.set_user(Some(User::new(json!({"id": "u2"}))));
        assert_eq!(ctx.user().and_then(|u| u.id().map(str::to_string)), Some("u2".into()));

        ctx.set_user(None);
        assert_eq!(ctx.snapshot().state, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_override_during_loading_wins() {
        let ctx = context(
            InMemoryTokenStore::with_token(Token::new("t")),
            Arc::new(MockIdentity::failing(IdentityError::Network("down".into()))),
        );
        // override lands before the resolver task gets to run
        ctx.set_user(Some(User::new(json!({"id": "fresh"}))));
        ctx.mount().unwrap().await.unwrap();

        assert_eq!(ctx.user(), Some(User::new(json!({"id": "fresh"}))));
    }

    #[tokio::test]
    async fn test_hung_identity_stays_loading() {
        let ctx = context(
            InMemoryTokenStore::with_token(Token::new("t")),
            Arc::new(MockIdentity::hanging()),
        );
        let handle = ctx.mount().unwrap();

        let outcome = tokio::time::timeout(Duration::from_millis(50), handle).await;
        assert!(outcome.is_err());
        assert!(ctx.loading());
    }

    #[tokio::test]
    async fn test_resolution_after_dispose_is_ignored() {
        let identity = Arc::new(MockIdentity::accepting(json!({"id": "u1"})));
        let ctx = context(InMemoryTokenStore::with_token(Token::new("t")), identity);

        ctx.dispose();
        ctx.mount().unwrap().await.unwrap();

        assert!(ctx.is_disposed());
        assert!(ctx.loading());
        assert_eq!(ctx.snapshot().revision, 0);
    }
}
