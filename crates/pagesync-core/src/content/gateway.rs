//! Content store port.

use async_trait::async_trait;

use super::document::ContentDocument;
use super::section::SectionId;
use crate::error::{FetchError, SaveError};
use crate::token::Token;

/// Backend content store, addressed by section.
///
/// Both operations issue exactly one request; neither retries nor caches.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Retrieves the stored document for `section`.
    ///
    /// The payload is returned verbatim, without checking its shape against
    /// any seed document.
    async fn fetch_section(
        &self,
        section: &SectionId,
        token: &Token,
    ) -> Result<ContentDocument, FetchError>;

    /// Replaces the stored document for `section` with `document` as a whole.
    async fn save_section(
        &self,
        section: &SectionId,
        document: &ContentDocument,
        token: &Token,
    ) -> Result<(), SaveError>;
}
