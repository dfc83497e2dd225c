//! Storage layer for durable client-side state.

mod origin_storage;

pub use origin_storage::{OriginStorage, OriginStorageError};
