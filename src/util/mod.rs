//! Utility modules for obs-buildlog

pub mod logging;

pub use logging::{init_logging, parse_level, LoggingConfig};
