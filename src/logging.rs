//! Diagnostic logging to stderr.
//!
//! stdout carries command output (tables, JSON) and must stay parseable,
//! so every log line goes to stderr. The filter comes from `VECTRA_LOG`
//! using `EnvFilter` syntax (e.g. `VECTRA_LOG=vectra=debug`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "VECTRA_LOG";

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
