use std::sync::Arc;

use pagesync_core::content::{ContentDocument, ContentGateway, SectionId};
use pagesync_core::{FetchError, Token};

/// Retrieves a section's stored document.
///
/// The failure is returned, not hidden: the caller decides to keep its seed
/// document.
#[derive(Clone)]
pub struct ContentFetcher {
    gateway: Arc<dyn ContentGateway>,
}

impl ContentFetcher {
    pub fn new(gateway: Arc<dyn ContentGateway>) -> Self {
        Self { gateway }
    }

    /// Fetches `section`. Without a token no request is made and
    /// `FetchError::NoCredential` is returned.
    pub async fn fetch_section(
        &self,
        section: &SectionId,
        token: Option<&Token>,
    ) -> Result<ContentDocument, FetchError> {
        let Some(token) = token else {
            return Err(FetchError::NoCredential);
        };
        self.gateway.fetch_section(section, token).await
    }
}
