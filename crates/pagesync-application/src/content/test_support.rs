//! Test doubles for the content gateway.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pagesync_core::content::{ContentDocument, ContentGateway, SectionId};
use pagesync_core::{FetchError, SaveError, Token};
use serde_json::Value;
use tokio::sync::Notify;

enum FetchBehavior {
    Serve(Value),
    Fail(FetchError),
}

pub(crate) struct MockContent {
    fetch: FetchBehavior,
    gate: Option<Arc<Notify>>,
    save_gate: Option<Arc<Notify>>,
    save_error: Mutex<Option<SaveError>>,
    fetch_calls: AtomicUsize,
    saved: Mutex<Vec<(SectionId, ContentDocument)>>,
}

impl MockContent {
    fn with(fetch: FetchBehavior) -> Self {
        Self {
            fetch,
            gate: None,
            save_gate: None,
            save_error: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Answers every fetch with `{ content: document }`.
    pub(crate) fn serving(document: Value) -> Self {
        Self::with(FetchBehavior::Serve(document))
    }

    pub(crate) fn failing(error: FetchError) -> Self {
        Self::with(FetchBehavior::Fail(error))
    }

    /// Holds each fetch until `gate` is notified.
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Holds each save until `gate` is notified.
    pub(crate) fn gated_saves(mut self, gate: Arc<Notify>) -> Self {
        self.save_gate = Some(gate);
        self
    }

    pub(crate) fn set_save_error(&self, error: Option<SaveError>) {
        *self.save_error.lock().unwrap() = error;
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn saved(&self) -> Vec<(SectionId, ContentDocument)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGateway for MockContent {
    async fn fetch_section(
        &self,
        _section: &SectionId,
        _token: &Token,
    ) -> Result<ContentDocument, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.fetch {
            FetchBehavior::Serve(document) => ContentDocument::from_value(document.clone())
                .map_err(|e| FetchError::Decode(e.to_string())),
            FetchBehavior::Fail(error) => Err(error.clone()),
        }
    }

    async fn save_section(
        &self,
        section: &SectionId,
        document: &ContentDocument,
        _token: &Token,
    ) -> Result<(), SaveError> {
        if let Some(gate) = &self.save_gate {
            gate.notified().await;
        }
        let failure = self.save_error.lock().unwrap().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        self.saved
            .lock()
            .unwrap()
            .push((section.clone(), document.clone()));
        Ok(())
    }
}
