//! Diagnostics for the bridge itself.
//!
//! The bridge lives inside someone else's process, so it never installs a
//! global subscriber unless asked to: either through an explicit filter or the
//! `BUILDTRACE_LOG` variable.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the default filter.
pub const LOG_ENV: &str = "BUILDTRACE_LOG";

/// Install a stderr `tracing` subscriber.
///
/// Returns `false` when no filter is configured, the filter does not parse, or
/// another subscriber is already installed.
pub fn init_logging(filter: Option<&str>, json: bool) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    };
    let Some(filter) = filter else {
        return false;
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
