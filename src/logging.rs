//! Tracing subscriber setup.
//!
//! Logs go to stderr so command output on stdout stays pipeable. The filter
//! is `debug` under `-v`, else `AGENCY_LOG` when set, else the config level.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{DeskConfig, ENV_LOG};

/// Build the filter: an explicit `AGENCY_LOG` directive wins over `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(config: &DeskConfig) {
    let filter = if config.verbose {
        EnvFilter::new(config.log_level())
    } else {
        env_filter(&config.log_level())
    };
    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        let filter = env_filter("definitely not a directive [");
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_level_directive_is_used() {
        if std::env::var(ENV_LOG).is_err() {
            assert_eq!(env_filter("debug").to_string(), "debug");
        }
    }
}
