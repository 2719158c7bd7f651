//! Logging init: human-readable events on stderr, stdout stays reserved for page text.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber with `filter`. The caller resolves the
/// filter (see `Config::log_filter`); the environment is not consulted here.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(filter))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

fn build_filter(filter: &str) -> EnvFilter {
    EnvFilter::new(filter)
}
