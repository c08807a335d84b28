//! Logging configuration and subscriber setup

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::{ConfigError, ValidationError};

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG` when set
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidLogFilter(self.level.clone()))
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Installs the global tracing subscriber.
    ///
    /// Fails if a subscriber is already installed.
    pub fn init(&self) -> Result<(), ConfigError> {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_target(false)
            .with_writer(std::io::stderr);

        let result = if self.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        result.map_err(|e| ConfigError::LoggingInit(e.to_string()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info,promosync=debug,sqlx=warn".to_string()
}
