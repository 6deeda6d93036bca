//! Tracing subscriber setup for the binary.
//!
//! Library consumers install their own subscriber; the core only emits
//! `tracing` events and never configures output itself.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber, filtered by `RUST_LOG` when set and by
/// `fallback` otherwise
///
/// Calling it again is a no-op, so tests and embedding hosts can both run it.
pub fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_line_number(true)
        .try_init();
}
