//! Content domain module.
//!
//! # Module Structure
//!
//! - `section`: section identifier (`SectionId`)
//! - `document`: the editable content tree (`ContentDocument`)
//! - `edit`: owned document with edit sessions (`EditableDocument`, `EditDraft`, `FieldPath`)
//! - `image`: image references inside item records (`ImageRef`)
//! - `gateway`: port to the backend content store (`ContentGateway`)

mod document;
mod edit;
mod gateway;
mod image;
mod section;

// Re-export public API
pub use document::ContentDocument;
pub use edit::{EditDraft, EditableDocument, FieldPath};
pub use gateway::ContentGateway;
pub use image::{ImageRef, TRANSIENT_SCHEME};
pub use section::SectionId;
