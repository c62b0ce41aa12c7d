//! Log output
//!
//! Everything below the binary logs through `tracing`; this installs the
//! subscriber that prints it.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `RUST_LOG` is given
pub const DEFAULT_FILTER: &str = "info";

/// Pick the filter directive: flag, then `RUST_LOG`, then the default
pub fn filter_directive(flag: Option<&str>, rust_log: Option<&str>) -> String {
    flag.or(rust_log)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install the global subscriber
pub fn init(level: Option<&str>) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(level, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("invalid log filter {:?}: {}", directive, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))
}
