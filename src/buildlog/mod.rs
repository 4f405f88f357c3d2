//! Build log segmentation and querying
//!
//! [`BuildLog::parse`] runs one forward pass over raw build output and splits
//! it into [`PhaseSegment`]s with durations and success verdicts.
//! [`BuildLog::query`] then serves bounded, filtered views of the result.

pub mod metadata;
pub mod parser;
pub mod phase;
pub mod query;
pub mod summary;
pub mod types;

pub use metadata::{BuildMetadata, LOCAL_PROJECT};
pub use parser::extract_time;
pub use phase::{next_phase, Phase};
pub use query::{LogQuery, PhaseView, QueryError, QueryResult, DEFAULT_MAX_LINES};
pub use summary::is_failure_line;
pub use types::{BuildLog, PhaseSegment};
