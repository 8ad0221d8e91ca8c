//! Tracing setup for the binaries.
//!
//! Verbosity is controlled with `RUST_LOG`; without it only warnings are
//! shown, which keeps fallback notices visible. Output goes to stderr so
//! JSON and CSV on stdout stay machine readable.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Calling it twice is a no-op.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
