//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "VITALS_LOG";

/// Filter used when `VITALS_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "vitals=info";

/// Initialize the Vitals tracing/logging system.
///
/// Reads `VITALS_LOG` for per-module log levels, e.g.
/// `VITALS_LOG=vitals_storage=debug,vitals_inference=info`.
/// Logs go to stderr so stdout stays clean for command output.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber installed by the host (tests, embedding app) wins.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
