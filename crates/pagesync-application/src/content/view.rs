//! A content view: one section, one owned document.
//!
//! Lifecycle:
//! 1. `new` with a seed document, shown until the server copy arrives
//! 2. `mount` fetches once; success replaces the document wholesale
//! 3. edits go through `begin_edit`/`commit_edit` (or the direct setters)
//! 4. `save` sends the whole document; the outcome is published as
//!    [`SaveStatus`]
//! 5. `dispose` drops late fetch and save results and revokes transient
//!    images
//!
//! Edits committed before the fetch completes are overwritten by it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use pagesync_core::content::{
    ContentDocument, ContentGateway, EditDraft, EditableDocument, FieldPath, ImageRef, SectionId,
};
use pagesync_core::{DocumentError, FetchError, SaveError, TokenStore};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

use super::fetcher::ContentFetcher;
use super::images::TransientImages;
use super::persistence::PersistenceGateway;
use crate::error::ViewError;

/// User-visible state of the save action.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved {
        at: DateTime<Utc>,
        /// Document revision that was sent.
        revision: u64,
    },
    /// Local edits are still in the view; the user can save again.
    Failed { message: String, error: SaveError },
}

struct ViewInner {
    section: SectionId,
    token_store: Arc<dyn TokenStore>,
    fetcher: ContentFetcher,
    persistence: PersistenceGateway,
    model: RwLock<EditableDocument>,
    images: Mutex<TransientImages>,
    save_status: watch::Sender<SaveStatus>,
    mounted: AtomicBool,
    disposed: AtomicBool,
}

/// Cheaply clonable handle on a view's state.
#[derive(Clone)]
pub struct ContentView {
    inner: Arc<ViewInner>,
}

impl ContentView {
    /// Creates an unmounted view showing `seed`.
    ///
    /// `origin` scopes the transient image URIs minted by this view.
    pub fn new(
        section: SectionId,
        seed: ContentDocument,
        token_store: Arc<dyn TokenStore>,
        gateway: Arc<dyn ContentGateway>,
        origin: impl Into<String>,
    ) -> Self {
        let (save_status, _receiver) = watch::channel(SaveStatus::Idle);
        Self {
            inner: Arc::new(ViewInner {
                section,
                token_store,
                fetcher: ContentFetcher::new(Arc::clone(&gateway)),
                persistence: PersistenceGateway::new(gateway),
                model: RwLock::new(EditableDocument::new(seed)),
                images: Mutex::new(TransientImages::new(origin)),
                save_status,
                mounted: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn section(&self) -> &SectionId {
        &self.inner.section
    }

    // ============================================================================
    // Fetch
    // ============================================================================

    /// Spawns the view's single fetch. Later calls return `None`.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            tracing::warn!("[ContentView] {} already mounted", self.inner.section);
            return None;
        }

        let view = self.clone();
        Some(tokio::spawn(async move {
            // outcome is logged inside load
            let _ = view.load().await;
        }))
    }

    /// Fetches the section and, on success, replaces the current document.
    ///
    /// On failure the current document stays; the error is returned for the
    /// caller's information only. Only `mount` calls this.
    async fn load(&self) -> Result<(), FetchError> {
        let section = &self.inner.section;
        let token = self.inner.token_store.get();
        let result = self.inner.fetcher.fetch_section(section, token.as_ref()).await;

        if self.is_disposed() {
            tracing::debug!("[ContentView] Fetch for {} finished after dispose, ignored", section);
            return result.map(|_| ());
        }

        match result {
            Ok(document) => {
                let mut model = self.inner.model.write().await;
                model.replace(document);
                tracing::info!(
                    "[ContentView] Loaded {} (revision {})",
                    section,
                    model.revision()
                );
                Ok(())
            }
            Err(FetchError::NoCredential) => {
                tracing::debug!("[ContentView] No token, {} keeps its default content", section);
                Err(FetchError::NoCredential)
            }
            Err(e) => {
                tracing::warn!(
                    "[ContentView] Fetch for {} failed, keeping current content: {}",
                    section,
                    e
                );
                Err(e)
            }
        }
    }

    // ============================================================================
    // Reads
    // ============================================================================

    pub async fn document(&self) -> ContentDocument {
        self.inner.model.read().await.document().clone()
    }

    pub async fn revision(&self) -> u64 {
        self.inner.model.read().await.revision()
    }

    // ============================================================================
    // Edits
    // ============================================================================

    pub async fn begin_edit(&self, path: FieldPath) -> Result<EditDraft, DocumentError> {
        self.inner.model.read().await.begin_edit(path)
    }

    /// Commits a finished draft (focus left the field) and returns the
    /// resulting document.
    pub async fn commit_edit(&self, draft: EditDraft) -> Result<ContentDocument, DocumentError> {
        let mut model = self.inner.model.write().await;
        if draft.base_revision() != model.revision() {
            tracing::debug!(
                "[ContentView] Draft for {:?} started at revision {}, committing onto {}",
                draft.path(),
                draft.base_revision(),
                model.revision()
            );
        }
        model.commit_edit(draft).cloned()
    }

    pub async fn set_scalar_field(
        &self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.inner.model.write().await.set_scalar_field(field, value)
    }

    pub async fn set_item_field(
        &self,
        collection: &str,
        index: usize,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.inner
            .model
            .write()
            .await
            .set_item_field(collection, index, field, value)
    }

    pub async fn set_image_reference(
        &self,
        collection: &str,
        index: usize,
        field: &str,
        image: &ImageRef,
    ) -> Result<(), DocumentError> {
        self.inner
            .model
            .write()
            .await
            .set_image_reference(collection, index, field, image)
    }

    /// Points an item's image at a freshly selected local file.
    pub async fn select_image(
        &self,
        collection: &str,
        index: usize,
        field: &str,
        file: &Path,
    ) -> Result<ImageRef, ViewError> {
        let image = self.inner.images.lock().await.register(file)?;

        if let Err(e) = self
            .set_image_reference(collection, index, field, &image)
            .await
        {
            self.inner.images.lock().await.revoke(image.as_uri());
            return Err(e.into());
        }
        Ok(image)
    }

    /// Local file behind a transient image URI minted by this view.
    pub async fn resolve_image(&self, uri: &str) -> Option<PathBuf> {
        self.inner
            .images
            .lock()
            .await
            .resolve(uri)
            .map(Path::to_path_buf)
    }

    // ============================================================================
    // Save
    // ============================================================================

    /// Sends the current document as a full replace of the section.
    ///
    /// Never touches the document: after a failure the edits are still here
    /// for the next attempt. Once the view is disposed the request still goes
    /// out but no status is published.
    pub async fn save(&self) -> Result<(), SaveError> {
        let section = &self.inner.section;
        if self.is_disposed() {
            tracing::warn!("[ContentView] Save of {} started after dispose", section);
        }
        let (document, revision) = {
            let model = self.inner.model.read().await;
            (model.document().clone(), model.revision())
        };

        self.publish_save_status(SaveStatus::Saving);

        let transient = self.inner.images.lock().await.len();
        if transient > 0 {
            tracing::warn!(
                "[ContentView] Saving {} with {} local image reference(s)",
                section,
                transient
            );
        }

        let token = self.inner.token_store.get();
        let result = self
            .inner
            .persistence
            .save(section, &document, token.as_ref())
            .await;

        match &result {
            Ok(()) => {
                tracing::info!("[ContentView] Saved {} (revision {})", section, revision);
                self.publish_save_status(SaveStatus::Saved {
                    at: Utc::now(),
                    revision,
                });
            }
            Err(e) => {
                tracing::warn!("[ContentView] Save of {} failed: {}", section, e);
                self.publish_save_status(SaveStatus::Failed {
                    message: e.user_message(),
                    error: e.clone(),
                });
            }
        }
        result
    }

    fn publish_save_status(&self, status: SaveStatus) {
        if self.is_disposed() {
            tracing::debug!(
                "[ContentView] {} disposed, dropping save status {:?}",
                self.inner.section,
                status
            );
            return;
        }
        self.inner.save_status.send_replace(status);
    }

    pub fn save_status(&self) -> SaveStatus {
        self.inner.save_status.borrow().clone()
    }

    pub fn subscribe_save_status(&self) -> watch::Receiver<SaveStatus> {
        self.inner.save_status.subscribe()
    }

    // ============================================================================
    // Teardown
    // ============================================================================

    pub async fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
        self.inner.images.lock().await.revoke_all();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }
}
