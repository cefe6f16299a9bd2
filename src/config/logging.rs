//! Tracing subscriber setup
//!
//! Log lines go to stderr so command output on stdout stays clean. The filter
//! is read from `PURSE_LOG` (same syntax as `RUST_LOG`).

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "PURSE_LOG";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber once; later calls are no-ops.
pub fn init() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("purse=warn"));

        // Another subscriber may already be installed by an embedding app
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();

        tracing::debug!("tracing initialized");
    });
}
