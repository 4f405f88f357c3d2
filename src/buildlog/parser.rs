//! Single-pass segmentation of raw build output into phases

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace};

use super::metadata::MetadataExtractor;
use super::phase::{next_phase, Phase};
use super::summary::{segment_succeeded, Verdict};
use super::types::{BuildLog, PhaseSegment};

fn timestamp() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[\s*(\d+)s\]").expect("valid regex"))
}

/// Elapsed seconds from a leading `[  N s]` token, if the line has one
pub fn extract_time(line: &str) -> Option<u64> {
    timestamp()
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
}

/// The segment currently receiving lines
struct OpenSegment {
    phase: Phase,
    start_time: u64,
    lines: Vec<String>,
    verdict: Verdict,
}

impl OpenSegment {
    fn new(phase: Phase, start_time: u64) -> Self {
        Self {
            phase,
            start_time,
            lines: Vec::new(),
            verdict: Verdict::default(),
        }
    }

    fn close(self, last_seen_time: u64) -> PhaseSegment {
        PhaseSegment {
            phase: self.phase,
            lines: self.lines,
            start_time: self.start_time,
            // Timestamps can run backwards across retries; clamp instead of going negative.
            duration: last_seen_time.saturating_sub(self.start_time),
            succeeded: self.verdict.succeeded(),
        }
    }
}

impl BuildLog {
    /// Parses raw build output.
    ///
    /// Never fails: text without any recognizable phase signature becomes a
    /// single Header segment, and unnamed metadata stays empty.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut metadata = MetadataExtractor::new();
        let mut segments = Vec::new();
        let mut last_seen_time = 0u64;
        let mut has_any_error = false;
        let mut open = OpenSegment::new(Phase::Header, 0);

        for line in raw.lines() {
            if let Some(time) = extract_time(line) {
                last_seen_time = time;
            }

            metadata.observe(line);

            let next = next_phase(open.phase, line);
            if next != open.phase {
                trace!(from = %open.phase, to = %next, at = last_seen_time, "Phase transition");
                let finished = std::mem::replace(&mut open, OpenSegment::new(next, last_seen_time));
                segments.push(finished.close(last_seen_time));
            }

            has_any_error |= open.verdict.observe(line);
            open.lines.push(line.to_string());
        }
        segments.push(open.close(last_seen_time));

        for segment in &mut segments {
            segment.succeeded = segment_succeeded(segment.phase, segment.succeeded, has_any_error);
        }

        let log = BuildLog {
            metadata: metadata.finish(),
            segments,
            raw,
        };

        debug!(
            name = %log.name(),
            project = %log.project(),
            distro = %log.distro(),
            arch = %log.arch(),
            segments = log.segments.len(),
            lines = log.line_count(),
            succeeded = log.succeeded(),
            "Parsed build log"
        );

        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(log: &BuildLog) -> Vec<Phase> {
        log.segments().iter().map(|s| s.phase()).collect()
    }

    #[test]
    fn test_extract_time() {
        assert_eq!(extract_time("[   12s] hello"), Some(12));
        assert_eq!(extract_time("[0s] init"), Some(0));
        assert_eq!(extract_time("no time [5s]"), None);
        assert_eq!(extract_time("[ 5m] nope"), None);
    }

    #[test]
    fn test_spec_scenario_summary_fails_on_earlier_error() {
        let log = BuildLog::parse(
            "[0s] init_buildsystem\n[2s] querying package ids...\n[5s] ERROR: x\n[6s] finished \"build foo\"",
        );

        let last = log.segments().last().unwrap();
        assert_eq!(last.phase(), Phase::Summary);
        assert_eq!(last.lines(), ["[6s] finished \"build foo\""]);
        assert!(!last.succeeded());

        let header = log.segment(Phase::Header).unwrap();
        assert!(!header.succeeded());
        assert_eq!(header.duration(), 6);
    }

    #[test]
    fn test_empty_input_is_single_header() {
        let log = BuildLog::parse("");
        assert_eq!(phases(&log), vec![Phase::Header]);
        assert!(log.segments()[0].lines().is_empty());
        assert_eq!(log.segments()[0].duration(), 0);
        assert!(log.succeeded());
    }

    #[test]
    fn test_unrecognized_text_is_single_header() {
        let log = BuildLog::parse("line one\nline two\nline three\n");
        assert_eq!(phases(&log), vec![Phase::Header]);
        assert_eq!(log.line_count(), 3);
        assert_eq!(log.segments()[0].duration(), 0);
    }

    #[test]
    fn test_durations_between_transitions() {
        let log = BuildLog::parse(
            "[    1s] header\n\
             [    3s] [1/2] preinstalling a\n\
             [    4s] [2/2] preinstalling b\n\
             [    9s] -----------------------------------------------------------------\n\
             [   20s] compiling\n\
             [   30s] host finished \"build a.spec\"\n",
        );

        assert_eq!(
            phases(&log),
            vec![Phase::Header, Phase::Preinstall, Phase::Build, Phase::Summary]
        );
        let durations: Vec<u64> = log.segments().iter().map(|s| s.duration()).collect();
        assert_eq!(durations, vec![3, 6, 21, 0]);
        let starts: Vec<u64> = log.segments().iter().map(|s| s.start_time()).collect();
        assert_eq!(starts, vec![0, 3, 9, 30]);
        assert!(log.succeeded());
    }

    #[test]
    fn test_backwards_timestamps_clamp_to_zero() {
        let log = BuildLog::parse(
            "[   50s] header\n\
             [   60s] [1/1] preinstalling a\n\
             [   10s] still preinstalling\n\
             [   12s] -----------------------------------------------------------------\n",
        );
        let preinstall = log.segment(Phase::Preinstall).unwrap();
        assert_eq!(preinstall.start_time(), 60);
        assert_eq!(preinstall.duration(), 0);
    }

    #[test]
    fn test_trigger_line_belongs_to_new_segment() {
        let log = BuildLog::parse("[1s] a\n[2s] RPMLINT report:\n[3s] b\n");
        let rpmlint = log.segment(Phase::RPMLintReport).unwrap();
        assert_eq!(rpmlint.lines(), ["[2s] RPMLINT report:", "[3s] b"]);
    }

    #[test]
    fn test_crlf_lines() {
        let log = BuildLog::parse("[1s] a\r\n[2s] b\r\n");
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["[1s] a", "[2s] b"]);
        assert!(log.raw().contains('\r'));
    }

    #[test]
    fn test_failure_is_segment_local_except_summary() {
        let log = BuildLog::parse(
            "[1s] [1/1] preinstalling a\n\
             [2s] -----------------------------------------------------------------\n\
             [3s] foo.c: error: boom\n\
             [4s] ... checking for files with abuild user/group\n\
             [5s] RPMLINT report:\n",
        );
        assert!(log.segment(Phase::Preinstall).unwrap().succeeded());
        assert!(!log.segment(Phase::Build).unwrap().succeeded());
        assert!(log.segment(Phase::PostBuildChecks).unwrap().succeeded());
        assert!(log.segment(Phase::RPMLintReport).unwrap().succeeded());
        assert!(!log.succeeded());
    }
}
