//! Diagnostic logging for failuresensectl
//!
//! Logs go to stderr so rendered results on stdout stay machine-readable.
//! Filter priority: $FAILURESENSE_LOG, then $RUST_LOG, then the verbosity
//! default (`warn`, or `debug` with -v).

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FAILURESENSE_LOG";

/// Build the filter for a verbosity level
pub fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "failuresensectl=debug,failuresense_shared=debug,warn"
    } else {
        "warn"
    };

    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
