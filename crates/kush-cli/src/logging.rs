#![forbid(unsafe_code)]

//! Subscriber setup. Filtering follows `RUST_LOG` (default `warn`); output
//! goes to stderr so stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. A second call is a no-op.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!(target: "kush.cli", "subscriber already installed");
    }
}
