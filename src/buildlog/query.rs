//! Bounded, filtered views over a parsed build log
//!
//! Callers such as an LLM agent must not receive a multi-megabyte log. A
//! query always returns the per-phase summary, but only surfaces lines for
//! failed phases (unless asked otherwise), after regex filtering, and only
//! within a global `offset`/`max_lines` window.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::metadata::BuildMetadata;
use super::phase::Phase;
use super::types::BuildLog;

/// Page size used when a query asks for zero or fewer lines
pub const DEFAULT_MAX_LINES: usize = 1000;

/// Query errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A filter pattern was malformed or the filters contradict each other
    #[error("Invalid filter '{pattern}': {reason}")]
    InvalidFilter { pattern: String, reason: String },
}

/// Parameters of a single query.
///
/// Signed fields accept whatever a caller sends; negative offsets read from
/// the start and non-positive limits fall back to [`DEFAULT_MAX_LINES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogQuery {
    pub offset: i64,
    pub max_lines: i64,
    pub show_succeeded: bool,
    pub include: Option<String>,
    pub exclude: Option<String>,
}

impl LogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_max_lines(mut self, max_lines: i64) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_show_succeeded(mut self, show_succeeded: bool) -> Self {
        self.show_succeeded = show_succeeded;
        self
    }

    pub fn with_include(mut self, pattern: impl Into<String>) -> Self {
        self.include = Some(pattern.into());
        self
    }

    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    fn effective_offset(&self) -> usize {
        usize::try_from(self.offset).unwrap_or(0)
    }

    fn effective_max_lines(&self) -> usize {
        match usize::try_from(self.max_lines) {
            Ok(0) | Err(_) => DEFAULT_MAX_LINES,
            Ok(n) => n,
        }
    }
}

/// Summary and (optionally) selected lines of one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseView {
    pub phase: Phase,
    pub duration_seconds: u64,
    pub success: bool,
    /// Present only for phases whose lines passed the success gate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<String>>,
}

/// Answer to a [`LogQuery`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub properties: BuildMetadata,
    pub phases: Vec<PhaseView>,
    /// Offset the window starts at
    pub offset: usize,
    /// Length of the filtered line stream before pagination
    pub total_lines: usize,
    pub returned_lines: usize,
    /// True when filtered lines remain after this window
    pub truncated: bool,
}

impl QueryResult {
    /// Offset for the following page, if there is one
    pub fn next_offset(&self) -> Option<usize> {
        self.truncated.then(|| self.offset + self.returned_lines)
    }

    /// Returned lines of all phases in log order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.phases
            .iter()
            .filter_map(|p| p.lines.as_ref())
            .flatten()
            .map(String::as_str)
    }
}

struct LineFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>, QueryError> {
    match pattern {
        None | Some("") => Ok(None),
        Some(p) => Regex::new(p).map(Some).map_err(|e| QueryError::InvalidFilter {
            pattern: p.to_string(),
            reason: e.to_string(),
        }),
    }
}

impl LineFilter {
    fn new(query: &LogQuery) -> Result<Self, QueryError> {
        let include = query.include.as_deref().filter(|p| !p.is_empty());
        let exclude = query.exclude.as_deref().filter(|p| !p.is_empty());

        if let (Some(inc), Some(exc)) = (include, exclude) {
            if inc == exc {
                return Err(QueryError::InvalidFilter {
                    pattern: inc.to_string(),
                    reason: "include and exclude patterns are identical".to_string(),
                });
            }
        }

        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    fn accepts(&self, line: &str) -> bool {
        if self.exclude.as_ref().is_some_and(|re| re.is_match(line)) {
            return false;
        }
        self.include.as_ref().map_or(true, |re| re.is_match(line))
    }
}

impl BuildLog {
    /// Runs a query against this log.
    ///
    /// Fails only with [`QueryError::InvalidFilter`]; no partial result is
    /// produced in that case.
    pub fn query(&self, query: &LogQuery) -> Result<QueryResult, QueryError> {
        let filter = LineFilter::new(query).map_err(|e| {
            warn!(error = %e, "Rejected build log query");
            e
        })?;

        let offset = query.effective_offset();
        let max_lines = query.effective_max_lines();
        let window_end = offset.saturating_add(max_lines);

        // Position in the global filtered stream across all gated-in phases.
        let mut position = 0usize;
        let mut returned = 0usize;
        let mut phases = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            let gated_in = query.show_succeeded || !segment.succeeded;
            let lines = gated_in.then(|| {
                let mut selected = Vec::new();
                for line in segment.lines.iter().filter(|l| filter.accepts(l)) {
                    if position >= offset && position < window_end {
                        selected.push(line.clone());
                    }
                    position += 1;
                }
                returned += selected.len();
                selected
            });

            phases.push(PhaseView {
                phase: segment.phase,
                duration_seconds: segment.duration,
                success: segment.succeeded,
                lines,
            });
        }

        let total_lines = position;
        let truncated = window_end < total_lines;

        debug!(
            offset,
            max_lines,
            total_lines,
            returned_lines = returned,
            truncated,
            "Queried build log"
        );

        Ok(QueryResult {
            properties: self.metadata.clone(),
            phases,
            offset,
            total_lines,
            returned_lines: returned,
            truncated,
        })
    }
}
