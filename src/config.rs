//! Configuration management for obs-buildlog
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `OBS_BUILDLOG_MAX_LINES`: Default number of log lines per query - default: "1000"
//! - `OBS_BUILDLOG_SHOW_SUCCEEDED`: Include lines of succeeded phases (true|false) - default: "false"
//! - `OBS_BUILDLOG_LOG_LEVEL`: Logging level - default: "info"
//! - `OBS_BUILDLOG_LOG_JSON`: Emit JSON logs (true|false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use obs_buildlog::BuildLogConfig;
//!
//! let config = BuildLogConfig::default();
//! config.validate().expect("Invalid configuration");
//!
//! let query = config.base_query();
//! assert_eq!(query.max_lines as usize, config.max_lines);
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

use crate::buildlog::{LogQuery, DEFAULT_MAX_LINES};

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SHOW_SUCCEEDED: bool = false;
const DEFAULT_LOG_JSON: bool = false;
const MAX_LINES_LIMIT: usize = 1_000_000;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLogConfig {
    /// Lines returned per query when the caller does not ask for a size
    pub max_lines: usize,

    /// Whether lines of succeeded phases are shown by default
    pub show_succeeded: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit logs as JSON
    pub log_json: bool,
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Default for BuildLogConfig {
    /// Loads OBS_BUILDLOG_* environment variables, falling back to defaults
    /// for anything missing or unparsable
    fn default() -> Self {
        Self {
            max_lines: env_parsed("OBS_BUILDLOG_MAX_LINES").unwrap_or(DEFAULT_MAX_LINES),
            show_succeeded: env_parsed("OBS_BUILDLOG_SHOW_SUCCEEDED")
                .unwrap_or(DEFAULT_SHOW_SUCCEEDED),
            log_level: env::var("OBS_BUILDLOG_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
            log_json: env_parsed("OBS_BUILDLOG_LOG_JSON").unwrap_or(DEFAULT_LOG_JSON),
        }
    }
}

impl BuildLogConfig {
    /// Strict variant of [`Default::default`]: a set but unparsable
    /// variable is an error instead of being ignored
    pub fn from_env() -> Result<Self, ConfigError> {
        fn strict<T: std::str::FromStr>(key: &str, fallback: T) -> Result<T, ConfigError>
        where
            T::Err: fmt::Display,
        {
            match env::var(key) {
                Ok(v) => v.trim().parse::<T>().map_err(|e| ConfigError::ParseError {
                    field: key.to_string(),
                    error: e.to_string(),
                }),
                Err(_) => Ok(fallback),
            }
        }

        let config = Self {
            max_lines: strict("OBS_BUILDLOG_MAX_LINES", DEFAULT_MAX_LINES)?,
            show_succeeded: strict("OBS_BUILDLOG_SHOW_SUCCEEDED", DEFAULT_SHOW_SUCCEEDED)?,
            log_level: env::var("OBS_BUILDLOG_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
            log_json: strict("OBS_BUILDLOG_LOG_JSON", DEFAULT_LOG_JSON)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the page size is out of range or the log
    /// level is unknown
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lines == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max lines must be at least 1".to_string(),
            ));
        }
        if self.max_lines > MAX_LINES_LIMIT {
            return Err(ConfigError::ValidationFailed(format!(
                "Max lines cannot exceed {}",
                MAX_LINES_LIMIT
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// A query pre-filled with the configured defaults
    pub fn base_query(&self) -> LogQuery {
        LogQuery::new()
            .with_max_lines(i64::try_from(self.max_lines).unwrap_or(i64::MAX))
            .with_show_succeeded(self.show_succeeded)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("max_lines".to_string(), self.max_lines.to_string());
        map.insert(
            "show_succeeded".to_string(),
            self.show_succeeded.to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());
        map
    }
}

impl fmt::Display for BuildLogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "obs-buildlog Configuration:")?;
        writeln!(f, "  Max Lines: {}", self.max_lines)?;
        writeln!(f, "  Show Succeeded: {}", self.show_succeeded)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}
