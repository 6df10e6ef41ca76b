/// Unified logger for centralized logging configuration

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,

    /// Include thread IDs
    pub include_thread_ids: bool,

    /// Include target module paths
    pub include_targets: bool,

    /// Colorize output
    pub ansi: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            include_thread_ids: false,
            include_targets: true,
            ansi: true,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }
}

/// Unified logger
pub struct UnifiedLogger;

impl UnifiedLogger {
    /// Initialize the global logger
    ///
    /// `RUST_LOG` takes precedence over the configured level. Output goes to
    /// stderr so command output on stdout stays clean. Fails if a global
    /// subscriber is already installed.
    pub fn init(config: LoggerConfig) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Create filter
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))?;

        // Create console layer
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_targets)
            .with_thread_ids(config.include_thread_ids)
            .with_ansi(config.ansi);

        // Build subscriber
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(console_layer);

        // Set as global default
        tracing::subscriber::set_global_default(subscriber)?;

        tracing::info!("Logging initialized with level: {}", config.level);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_config_default() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.include_targets);
    }

    #[test]
    fn test_logger_config_with_level() {
        let config = LoggerConfig::with_level("debug");
        assert_eq!(config.level, "debug");
        assert!(!config.include_thread_ids);
    }
}
