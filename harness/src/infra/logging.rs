//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "HARNESS_LOG";

/// Install a formatted subscriber filtered by `HARNESS_LOG`, or by `default`
/// when the variable is unset or invalid.
///
/// A second call, or a subscriber installed elsewhere, leaves the existing
/// one in place.
pub fn init(default: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
