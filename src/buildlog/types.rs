use serde::Serialize;

use super::metadata::BuildMetadata;
use super::phase::Phase;

/// A contiguous run of log lines belonging to one build phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSegment {
    pub(crate) phase: Phase,
    pub(crate) lines: Vec<String>,
    pub(crate) start_time: u64,
    pub(crate) duration: u64,
    pub(crate) succeeded: bool,
}

impl PhaseSegment {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Elapsed seconds at the line that opened this segment
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Seconds spent in this segment
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }
}

/// A parsed build log.
///
/// Immutable once built by [`BuildLog::parse`](crate::BuildLog::parse); the
/// segments, concatenated in order, hold every line of the raw text exactly
/// once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildLog {
    pub(crate) metadata: BuildMetadata,
    pub(crate) segments: Vec<PhaseSegment>,
    #[serde(skip)]
    pub(crate) raw: String,
}

impl BuildLog {
    pub fn metadata(&self) -> &BuildMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn project(&self) -> &str {
        &self.metadata.project
    }

    pub fn distro(&self) -> &str {
        &self.metadata.distro
    }

    pub fn arch(&self) -> &str {
        &self.metadata.arch
    }

    pub fn segments(&self) -> &[PhaseSegment] {
        &self.segments
    }

    /// The unmodified text this log was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First segment of the given phase, if the build reached it
    pub fn segment(&self, phase: Phase) -> Option<&PhaseSegment> {
        self.segments.iter().find(|s| s.phase == phase)
    }

    /// All lines in log order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .flat_map(|s| s.lines.iter().map(String::as_str))
    }

    pub fn line_count(&self) -> usize {
        self.segments.iter().map(|s| s.lines.len()).sum()
    }

    /// True when every segment succeeded
    pub fn succeeded(&self) -> bool {
        self.segments.iter().all(|s| s.succeeded)
    }

    /// Sum of all segment durations in seconds
    pub fn total_duration(&self) -> u64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}
