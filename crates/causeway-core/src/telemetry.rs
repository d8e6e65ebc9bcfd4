//! Tracing initialization for binaries and long-running harnesses.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing/logging system.
///
/// Reads the `CAUSEWAY_LOG` environment variable for per-subsystem log
/// levels, e.g. `CAUSEWAY_LOG=causeway_causal=debug,causeway_agent=info`.
/// Falls back to `info` if unset or invalid.
///
/// Idempotent: repeated calls are safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("CAUSEWAY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
