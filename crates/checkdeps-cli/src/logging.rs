//! Logging initialization for the CLI.
//!
//! The core crate only emits `tracing` events; installing a subscriber is
//! the binary's job. All diagnostics go to stderr so stdout stays reserved
//! for report output.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Map a `-v` count to the maximum level, if it raises the default.
///
/// 0 leaves `RUST_LOG` (or `warn`) in charge, 1 = INFO, 2 = DEBUG, 3+ = TRACE.
fn level_for(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::INFO),
        2 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Initialize the tracing subscriber.
///
/// With `json`, events are written as JSON lines:
/// ```json
/// {"timestamp":"...","level":"INFO","fields":{"message":"invoking package manager","command":"npm install"},"target":"checkdeps_core::reconcile"}
/// ```
///
/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = match level_for(verbosity) {
        Some(level) => filter.add_directive(level.into()),
        None => filter,
    };

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
