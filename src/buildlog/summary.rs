//! Success verdicts for build phases
//!
//! A phase is failed when any of its lines carries a failure marker. The
//! Summary phase is the one exception: it also fails when a marker appeared
//! anywhere earlier in the log, since a build can finish with a clean
//! `finished "build ..."` line after an error in the Build phase.

use regex::Regex;
use std::sync::OnceLock;

use super::phase::Phase;

fn failure_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:FAILED|ERROR)\b").expect("valid regex"))
}

/// True when `line` looks like it reports a failure.
///
/// Matches `error:` / `failed:` in any case, or the upper-case words
/// `ERROR` / `FAILED`.
pub fn is_failure_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("error:") || lower.contains("failed:") || failure_token().is_match(line)
}

/// Running verdict for the segment currently being scanned
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Verdict {
    failed: bool,
}

impl Verdict {
    /// Records one line, returning whether it was a failure marker
    pub(crate) fn observe(&mut self, line: &str) -> bool {
        let failure = is_failure_line(line);
        self.failed |= failure;
        failure
    }

    pub(crate) fn succeeded(self) -> bool {
        !self.failed
    }
}

/// Final success flag for a closed segment
pub(crate) fn segment_succeeded(phase: Phase, own_success: bool, has_any_error: bool) -> bool {
    match phase {
        Phase::Summary => own_success && !has_any_error,
        _ => own_success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        gcc_error = { "foo.c:12:3: error: expected ';'", true },
        upper_error_colon = { "[5s] ERROR: x", true },
        failed_colon = { "Failed: 3 tests", true },
        upper_failed_word = { "test_foo ... FAILED", true },
        upper_error_word = { "[ 20s] ERROR something broke", true },
        werror_flag = { "gcc -Werror -O2 foo.c", false },
        error_in_name = { "installing liberror-perl-0.17", false },
        lowercase_word = { "checking for error handling... yes", false },
        clean = { "[ 41s] finished \"build foo.spec\"", false },
        errors_suffix = { "ERRORS", false },
    )]
    fn test_failure_markers(line: &str, expected: bool) {
        assert_eq!(is_failure_line(line), expected);
    }

    #[test]
    fn test_verdict_accumulates() {
        let mut verdict = Verdict::default();
        assert!(!verdict.observe("all good"));
        assert!(verdict.succeeded());
        assert!(verdict.observe("error: boom"));
        assert!(!verdict.observe("still fine"));
        assert!(!verdict.succeeded());
    }

    #[test]
    fn test_summary_depends_on_whole_log() {
        assert!(!segment_succeeded(Phase::Summary, true, true));
        assert!(segment_succeeded(Phase::Summary, true, false));
        assert!(segment_succeeded(Phase::Build, true, true));
        assert!(!segment_succeeded(Phase::Build, false, false));
    }
}
