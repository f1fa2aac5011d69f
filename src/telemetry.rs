//! Log subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs a formatted subscriber filtered by `directives`.
///
/// `RUST_LOG` takes precedence when set. Invalid directives fall back to
/// `info`.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init(directives: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).try_init()
}
