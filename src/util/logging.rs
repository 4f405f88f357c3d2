//! Structured logging setup for obs-buildlog
//!
//! Initializes a `tracing` subscriber that writes to stderr, so stdout stays
//! free for parse results. Supports pretty or JSON output and honours
//! `RUST_LOG` when it is set.
//!
//! # Example
//!
//! ```no_run
//! use obs_buildlog::util::logging::{init_logging, parse_level, LoggingConfig};
//!
//! init_logging(LoggingConfig::with_level(parse_level("debug")));
//!
//! use tracing::{debug, info};
//! info!("Parsing build log");
//! debug!(lines = 1200, "Read input");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., obs_buildlog::buildlog::parser) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Include thread IDs in logs
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    /// INFO level, pretty output with targets, no location or thread ids
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string
///
/// Case-insensitive; unknown values fall back to `Level::INFO`.
///
/// ```
/// use obs_buildlog::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Builds the filter: `RUST_LOG` when set, otherwise the configured level for this crate
fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let filter = EnvFilter::new("warn");
    match format!("obs_buildlog={}", level).parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Installs the global subscriber; later calls are no-ops
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let json = config.use_json.then(|| {
            fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_target(config.include_target)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.include_thread_ids)
        });
        let pretty = (!config.use_json).then(|| {
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(config.include_target)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.include_thread_ids)
        });

        tracing_subscriber::registry()
            .with(build_filter(config.level))
            .with(json)
            .with(pretty)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
        assert!(config.include_target);
        assert!(!config.include_location);
        assert!(!config.include_thread_ids);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(LoggingConfig::with_level(Level::DEBUG));
        init_logging(LoggingConfig {
            use_json: true,
            ..Default::default()
        });
        tracing::debug!("still logging");
    }

    #[test]
    fn test_with_level() {
        assert_eq!(LoggingConfig::with_level(Level::WARN).level, Level::WARN);
    }
}
