//! Client bootstrap: wires config, storage, backend and the session context.

use std::sync::Arc;

use anyhow::{Context, Result};
use pagesync_core::TokenStore;
use pagesync_core::content::{ContentDocument, SectionId};
use pagesync_infrastructure::{
    ClientConfig, FileTokenStore, HttpBackend, PageSyncPaths, init_tracing,
};
use tokio::task::JoinHandle;

use crate::content::ContentView;
use crate::session::{SessionContext, SessionResolver};

/// Everything a running client shares between its views.
pub struct PageSyncApp {
    config: ClientConfig,
    origin: String,
    token_store: Arc<dyn TokenStore>,
    backend: Arc<HttpBackend>,
    session: SessionContext,
}

impl PageSyncApp {
    /// Loads `config.toml` (plus environment overrides) and builds the client.
    pub fn bootstrap(paths: &PageSyncPaths) -> Result<Self> {
        let config = ClientConfig::load(paths).context("Failed to load client config")?;
        Self::with_config(config, paths)
    }

    /// Builds the client from an already loaded config.
    pub fn with_config(config: ClientConfig, paths: &PageSyncPaths) -> Result<Self> {
        init_tracing(&config.logging);

        let origin = config.origin()?;
        let data_dir = config.data_dir(paths)?;
        let token_store: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::for_origin(&data_dir, &origin));
        let backend = Arc::new(
            HttpBackend::new(&config.backend).context("Failed to create backend client")?,
        );

        let session = SessionContext::new(SessionResolver::new(
            Arc::clone(&token_store),
            backend.clone(),
        ));

        tracing::info!(
            "[PageSyncApp] Ready for {} (storage: {})",
            origin,
            data_dir.display()
        );

        Ok(Self {
            config,
            origin,
            token_store,
            backend,
            session,
        })
    }

    /// Starts session resolution. Must run inside a tokio runtime.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        self.session.mount()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.token_store)
    }

    /// New, unmounted view over `section`, showing `seed` until its fetch
    /// succeeds.
    pub fn content_view(
        &self,
        section: impl Into<SectionId>,
        seed: ContentDocument,
    ) -> ContentView {
        ContentView::new(
            section.into(),
            seed,
            Arc::clone(&self.token_store),
            self.backend.clone(),
            self.origin.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesync_core::Token;
    use pagesync_core::session::SessionState;
    use serde_json::json;
    use tempfile::TempDir;

    fn app(temp_dir: &TempDir) -> PageSyncApp {
        let paths = PageSyncPaths::new(Some(temp_dir.path()));
        PageSyncApp::with_config(ClientConfig::default(), &paths).unwrap()
    }

    #[tokio::test]
    async fn test_no_stored_token_resolves_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir);
        assert!(app.session().loading());

        app.start().unwrap().await.unwrap();

        assert!(!app.session().loading());
        assert_eq!(app.session().snapshot().state, SessionState::Anonymous);
        assert!(app.start().is_none());
    }

    #[tokio::test]
    async fn test_token_persists_across_bootstraps() {
        let temp_dir = TempDir::new().unwrap();
        app(&temp_dir).token_store().set(Token::new("abc")).unwrap();

        let reopened = app(&temp_dir);
        assert_eq!(reopened.token_store().get(), Some(Token::new("abc")));
        assert_eq!(reopened.origin(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_content_view_without_token_shows_seed() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir);
        let seed = ContentDocument::from_value(json!({"title": "Default"})).unwrap();

        let view = app.content_view("home", seed.clone());
        view.mount().unwrap().await.unwrap();

        assert_eq!(view.document().await, seed);
        assert_eq!(view.section().as_str(), "home");
    }

    #[test]
    fn test_invalid_base_url_fails_bootstrap() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ClientConfig::default();
        config.backend.base_url = "not a url".to_string();

        let paths = PageSyncPaths::new(Some(temp_dir.path()));
        assert!(PageSyncApp::with_config(config, &paths).is_err());
    }
}
