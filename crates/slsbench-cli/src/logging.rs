//! Log subscriber setup
//!
//! Everything goes to stderr so stdout stays usable for graph dumps and
//! output paths.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to `level`
pub fn env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("invalid log level {level:?}: {e}"))
}

/// Install the global subscriber
pub fn init(level: &str, json: bool) -> anyhow::Result<()> {
    let filter = env_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
