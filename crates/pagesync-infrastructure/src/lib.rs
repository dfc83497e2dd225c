//! Adapters for PageSync: durable origin storage, token stores, the HTTP
//! backend client, configuration and logging.

pub mod config;
pub mod http_backend;
pub mod logging;
pub mod paths;
pub mod storage;
pub mod token_store;

pub use crate::config::{BackendConfig, ClientConfig, LoggingConfig, SaveMethod, StorageConfig};
pub use crate::http_backend::HttpBackend;
pub use crate::logging::init_tracing;
pub use crate::paths::PageSyncPaths;
pub use crate::storage::{OriginStorage, OriginStorageError};
pub use crate::token_store::{FileTokenStore, InMemoryTokenStore};
