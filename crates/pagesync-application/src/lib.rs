//! Application layer for PageSync.
//!
//! Coordinates the domain types in `pagesync-core` with the adapters in
//! `pagesync-infrastructure`: the shared session context, per-section
//! content views and the client bootstrap.

pub mod app;
pub mod content;
pub mod error;
pub mod session;

pub use app::PageSyncApp;
pub use content::{ContentView, SaveStatus};
pub use error::{ImageSelectionError, ViewError};
pub use session::{SessionContext, SessionResolver};
