//! Tracing subscriber setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins over the configured level. Only the first call has an
/// effect; later calls (e.g. from several tests) are ignored.
pub fn init_tracing(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        if let Err(e) = result {
            // another subscriber was installed by the host application
            eprintln!("[Logging] tracing subscriber already set: {}", e);
        }
    });
}
