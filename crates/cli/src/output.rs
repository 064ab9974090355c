//! Log output
//!
//! Events go to standard output, as text or as one JSON object per line.
//! Our own crates log at DEBUG and above, dependencies at WARN, unless
//! `RUST_LOG` says otherwise.

use std::io::IsTerminal;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,s3_upload=debug,upload_core=debug,upload_s3=debug";

/// Build the level filter, falling back to [`DEFAULT_FILTER`]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    let layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false);

    let registry = tracing_subscriber::registry().with(env_filter());
    if json {
        registry
            .with(layer.json().flatten_event(true))
            .try_init()
            .context("failed to initialise JSON logging")
    } else {
        registry
            .with(layer)
            .try_init()
            .context("failed to initialise logging")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).unwrap();
        assert!(filter.to_string().contains("upload_core=debug"));
    }
}
