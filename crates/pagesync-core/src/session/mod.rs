//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: user identity record and the tri-state session (`SessionState`)
//! - `identity`: port to the backend identity endpoint (`IdentityGateway`)
//!
//! # Usage
//!
//! ```ignore
//! use pagesync_core::session::{IdentityGateway, SessionSnapshot, SessionState, User};
//! ```

mod identity;
mod model;

// Re-export public API
pub use identity::IdentityGateway;
pub use model::{SessionSnapshot, SessionState, User};
