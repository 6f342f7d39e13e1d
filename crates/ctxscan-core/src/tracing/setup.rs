//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the ctxscan tracing/logging system.
///
/// Reads the `CTXSCAN_LOG` environment variable for per-module log levels,
/// e.g. `CTXSCAN_LOG=ctxscan_engine::scanner=debug,ctxscan_engine::ignore=warn`.
/// Falls back to `ctxscan=info` if unset or invalid.
///
/// Idempotent. If the host already installed a global subscriber, this is a
/// no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("CTXSCAN_LOG")
            .unwrap_or_else(|_| EnvFilter::new("ctxscan=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
