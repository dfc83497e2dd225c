use std::sync::Arc;

use pagesync_core::content::{ContentDocument, ContentGateway, SectionId};
use pagesync_core::{SaveError, Token};

/// Sends a whole document back as an atomic replace of its section.
///
/// No retry and no debounce: every call is one user-triggered request.
#[derive(Clone)]
pub struct PersistenceGateway {
    gateway: Arc<dyn ContentGateway>,
}

impl PersistenceGateway {
    pub fn new(gateway: Arc<dyn ContentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn save(
        &self,
        section: &SectionId,
        document: &ContentDocument,
        token: Option<&Token>,
    ) -> Result<(), SaveError> {
        let Some(token) = token else {
            return Err(SaveError::NoCredential);
        };
        self.gateway.save_section(section, document, token).await
    }
}
