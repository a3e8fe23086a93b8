//! Logging setup for gearmon binaries.
//!
//! Library crates emit through `tracing` macros only; binaries call
//! [`init_logging`] once at startup to install the subscriber.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter (trace, debug, info, warn, error). `RUST_LOG`
    /// overrides it when set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for log files; no file logging when unset.
    pub log_dir: Option<PathBuf>,

    /// Whether to emit JSON instead of the human format.
    #[serde(default)]
    pub json_format: bool,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_level(),
            log_dir: None,
            json_format: false,
        }
    }
}

/// Install the global subscriber. Call once at startup.
///
/// Returns the non-blocking writer guard when file logging is enabled; the
/// caller must keep it alive for the life of the process.
pub fn init_logging(config: &LogConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json_format
    {
        Box::new(fmt::layer().json())
    } else {
        Box::new(fmt::layer())
    };

    let (file_layer, guard): (
        Option<Box<dyn tracing_subscriber::Layer<_> + Send + Sync>>,
        Option<tracing_appender::non_blocking::WorkerGuard>,
    ) = match &config.log_dir {
        Some(log_dir) => {
            let appender = rolling::daily(log_dir, "gearmon.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json_format
            {
                Box::new(fmt::layer().json().with_writer(non_blocking))
            } else {
                Box::new(fmt::layer().with_writer(non_blocking))
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.log_dir.is_none());
        assert!(!config.json_format);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
    }
}
