//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `haven.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine timing settings.
    pub engine: EngineConfig,
    /// Rule persistence settings.
    pub rules: RulesConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Poll-loop and timer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Poll-loop tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Seconds before an automatically opened garage closes itself.
    pub garage_auto_close_secs: u64,
    /// Upper bound on a single driver call, in milliseconds.
    pub driver_timeout_ms: u64,
}

/// Rule-file configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Path of the JSON rule file.
    pub path: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `haven.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("haven.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HAVEN_TICK_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                self.engine.tick_interval_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("HAVEN_RULES_PATH") {
            self.rules.path = val;
        }
        if let Ok(val) = std::env::var("HAVEN_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick interval must be non-zero".to_string(),
            ));
        }
        if self.engine.driver_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "driver timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The poll-loop tick interval.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.engine.tick_interval_ms)
    }

    /// The controller settings derived from this configuration.
    #[must_use]
    pub fn engine_settings(&self) -> haven_app::controller::Settings {
        haven_app::controller::Settings {
            garage_auto_close: Duration::from_secs(self.engine.garage_auto_close_secs),
            driver_timeout: Duration::from_millis(self.engine.driver_timeout_ms),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            garage_auto_close_secs: 120,
            driver_timeout_ms: 1000,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: "automation_rules.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "havend=info,haven=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
