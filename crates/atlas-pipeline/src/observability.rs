//! Tracing initialization.

use std::sync::Once;

use atlas_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `ATLAS_LOG=atlas_clustering=debug`.
pub const LOG_ENV: &str = "ATLAS_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber. `ATLAS_LOG` wins over the configured
/// level. Idempotent; a subscriber installed elsewhere is left alone.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

        let result = if config.json_logs {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .with(filter)
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
        };
        if result.is_err() {
            tracing::debug!("global subscriber already installed");
        }
    });
}
