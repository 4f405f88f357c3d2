//! Build phases and the line signatures that open them
//!
//! An OBS build walks through a fixed sequence of stages. Each stage is
//! announced by a recognizable line in the build output; [`next_phase`]
//! turns those lines into forward-only transitions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A stage of a package build, in lifecycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Header,
    Preinstall,
    CopyingPackages,
    VMBoot,
    PackageCumulation,
    PackageInstallation,
    Build,
    PostBuildChecks,
    RPMLintReport,
    PackageComparison,
    Summary,
    Retries,
}

impl Phase {
    /// All phases in lifecycle order
    pub const ALL: [Phase; 12] = [
        Phase::Header,
        Phase::Preinstall,
        Phase::CopyingPackages,
        Phase::VMBoot,
        Phase::PackageCumulation,
        Phase::PackageInstallation,
        Phase::Build,
        Phase::PostBuildChecks,
        Phase::RPMLintReport,
        Phase::PackageComparison,
        Phase::Summary,
        Phase::Retries,
    ];

    /// Position of the phase in the lifecycle
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Header => "Header",
            Phase::Preinstall => "Preinstall",
            Phase::CopyingPackages => "CopyingPackages",
            Phase::VMBoot => "VMBoot",
            Phase::PackageCumulation => "PackageCumulation",
            Phase::PackageInstallation => "PackageInstallation",
            Phase::Build => "Build",
            Phase::PostBuildChecks => "PostBuildChecks",
            Phase::RPMLintReport => "RPMLintReport",
            Phase::PackageComparison => "PackageComparison",
            Phase::Summary => "Summary",
            Phase::Retries => "Retries",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .iter()
            .copied()
            .find(|phase| phase.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<&str> = Phase::ALL.iter().map(|p| p.name()).collect();
                format!("Unknown phase: {}. Valid options: {}", s, valid.join(", "))
            })
    }
}

/// Leading elapsed-time token, e.g. `[  12s]`
const TIMESTAMP_PREFIX: &str = r"^\[\s*\d+s\]";

/// Phase entry signatures in lifecycle order, indexed like [`Phase::ALL`]
fn signature_sources() -> [(Phase, String); 12] {
    let ts = TIMESTAMP_PREFIX;
    [
        // Never evaluated as a transition target; the log starts here.
        (Phase::Header, r"^\[".to_string()),
        (Phase::Preinstall, format!(r"{ts} \[[\s\d/]+\] preinstalling")),
        (Phase::CopyingPackages, format!(r"{ts} copying packages\.")),
        (Phase::VMBoot, format!(r"{ts} booting kvm\.")),
        (Phase::PackageCumulation, format!(r"{ts} \[[\s\d/]+\] cumulate")),
        (
            Phase::PackageInstallation,
            format!(r"{ts} now installing cumulated packages"),
        ),
        (Phase::Build, format!(r"{ts} -{{65}}")),
        (
            Phase::PostBuildChecks,
            format!(r"{ts} \.\.\. checking for files with abuild user/group"),
        ),
        (Phase::RPMLintReport, format!(r"{ts} RPMLINT report:")),
        (
            Phase::PackageComparison,
            format!(r"{ts} \.\.\. comparing built packages with the former built"),
        ),
        // Remote workers prefix the host name (`i01-ch1a finished ...`), local builds may not.
        (Phase::Summary, format!(r#"{ts} (?:\S+ )?finished "build .+""#)),
        (Phase::Retries, r"^Retried build at".to_string()),
    ]
}

/// Compiled signature table
pub fn signatures() -> &'static [(Phase, Regex)] {
    static TABLE: OnceLock<Vec<(Phase, Regex)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        signature_sources()
            .into_iter()
            .map(|(phase, pattern)| (phase, Regex::new(&pattern).expect("valid regex")))
            .collect()
    })
}

/// Returns the phase `line` moves the build into.
///
/// Only phases strictly after `current` are considered, so the state
/// machine never regresses. Returns `current` when nothing matches.
pub fn next_phase(current: Phase, line: &str) -> Phase {
    signatures()
        .iter()
        .skip(current.index() + 1)
        .find(|(_, matcher)| matcher.is_match(line))
        .map(|(phase, _)| *phase)
        .unwrap_or(current)
}
