//! obs-buildlog - phase segmentation and bounded queries over OBS build logs
//!
//! This library turns the raw output of an Open Build Service package build
//! (a local `osc build` run or the body of a remote `_log` request) into a
//! sequence of build phases with durations and success verdicts, and answers
//! size-bounded, filtered queries over the result for callers that cannot
//! take a multi-megabyte log.
//!
//! # Core Concepts
//!
//! - **Phase**: a stage of the build lifecycle (preinstall, build, rpmlint,
//!   ...). Phases only ever move forward while a log is scanned.
//! - **Segment**: the lines of one phase, with the elapsed time spent in it
//!   and whether any line reported a failure.
//! - **Query**: a window over the lines of failed (or all) phases, with
//!   optional include/exclude regex filters.
//!
//! # Example Usage
//!
//! ```
//! use obs_buildlog::{BuildLog, LogQuery, Phase};
//!
//! let raw = "[  0s] Using BUILD_ROOT=/var/tmp/build-root/openSUSE_Tumbleweed-x86_64\n\
//!            [  1s] [1/1] preinstalling bash\n\
//!            [  4s] -----------------------------------------------------------------\n\
//!            [  9s] foo.c:3: error: expected ';'\n";
//!
//! let log = BuildLog::parse(raw);
//! assert_eq!(log.segments().len(), 3);
//! assert!(!log.segment(Phase::Build).unwrap().succeeded());
//!
//! let result = log.query(&LogQuery::new().with_max_lines(50))?;
//! assert_eq!(result.lines().count(), 2);
//! # Ok::<(), obs_buildlog::QueryError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`buildlog`]: phase table, scanner, verdicts and queries
//! - [`cache`]: latest parsed log per build identity
//! - [`config`]: environment-driven defaults
//! - [`cli`]: the `obs-buildlog` command line

pub mod buildlog;
pub mod cache;
pub mod cli;
pub mod config;
pub mod util;

pub use buildlog::{
    BuildLog, BuildMetadata, LogQuery, Phase, PhaseSegment, PhaseView, QueryError, QueryResult,
    DEFAULT_MAX_LINES,
};
pub use cache::{BuildKey, BuildLogCache};
pub use config::{BuildLogConfig, ConfigError};
pub use util::{init_logging, parse_level, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "obs-buildlog");
    }
}
