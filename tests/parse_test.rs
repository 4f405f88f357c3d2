//! Segmentation tests against recorded build logs

use obs_buildlog::buildlog::LOCAL_PROJECT;
use obs_buildlog::{BuildLog, Phase};
use std::fs;
use std::path::PathBuf;
use yare::parameterized;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/buildlogs")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn summary(log: &BuildLog) -> Vec<(Phase, usize, u64, bool)> {
    log.segments()
        .iter()
        .map(|s| (s.phase(), s.lines().len(), s.duration(), s.succeeded()))
        .collect()
}

#[test]
fn test_remote_kvm_build_segments() {
    let log = BuildLog::parse(fixture("remote-kvm.log"));

    assert_eq!(
        summary(&log),
        vec![
            (Phase::Header, 12, 2, true),
            (Phase::Preinstall, 4, 1, true),
            (Phase::CopyingPackages, 2, 2, true),
            (Phase::VMBoot, 3, 4, true),
            (Phase::PackageCumulation, 3, 0, true),
            (Phase::PackageInstallation, 3, 7, true),
            (Phase::Build, 7, 22, true),
            (Phase::PostBuildChecks, 1, 1, true),
            (Phase::RPMLintReport, 3, 1, true),
            (Phase::PackageComparison, 2, 1, true),
            (Phase::Summary, 2, 0, true),
            (Phase::Retries, 1, 0, true),
        ]
    );
    assert!(log.succeeded());
    assert_eq!(log.total_duration(), 41);
}

#[test]
fn test_remote_kvm_build_metadata() {
    let log = BuildLog::parse(fixture("remote-kvm.log"));

    assert_eq!(log.name(), "gflags");
    assert_eq!(log.project(), "home:mslacken:ml");
    assert_eq!(log.distro(), "16.0");
    assert_eq!(log.arch(), "aarch64");
}

#[test]
fn test_local_chroot_build_segments() {
    let log = BuildLog::parse(fixture("local-chroot-failed.log"));

    assert_eq!(
        summary(&log),
        vec![
            (Phase::Header, 13, 5, true),
            (Phase::Build, 9, 36, false),
            (Phase::Summary, 1, 0, false),
        ]
    );
    assert!(!log.succeeded());

    let build = log.segment(Phase::Build).unwrap();
    assert_eq!(build.start_time(), 5);
    assert!(build.lines()[0].ends_with(&"-".repeat(65)));
}

#[test]
fn test_local_chroot_build_metadata() {
    let log = BuildLog::parse(fixture("local-chroot-failed.log"));

    assert_eq!(log.name(), "warewulf4");
    assert_eq!(log.project(), LOCAL_PROJECT);
    assert_eq!(log.distro(), "15.6");
    assert_eq!(log.arch(), "x86_64");
}

#[parameterized(
    remote = { "remote-kvm.log" },
    local = { "local-chroot-failed.log" },
)]
fn test_every_line_lands_in_one_segment(name: &str) {
    let raw = fixture(name);
    let log = BuildLog::parse(raw.clone());

    let rebuilt: Vec<&str> = log.lines().collect();
    let original: Vec<&str> = raw.lines().collect();
    assert_eq!(rebuilt, original);
    assert_eq!(log.line_count(), original.len());
}

#[parameterized(
    remote = { "remote-kvm.log" },
    local = { "local-chroot-failed.log" },
)]
fn test_phases_strictly_increase(name: &str) {
    let log = BuildLog::parse(fixture(name));

    let phases: Vec<Phase> = log.segments().iter().map(|s| s.phase()).collect();
    assert!(phases.windows(2).all(|w| w[0] < w[1]), "{:?}", phases);
    assert_eq!(phases.first(), Some(&Phase::Header));
}

#[parameterized(
    remote = { "remote-kvm.log" },
    local = { "local-chroot-failed.log" },
)]
fn test_parse_is_deterministic(name: &str) {
    let raw = fixture(name);
    let first = BuildLog::parse(raw.clone());
    let second = BuildLog::parse(raw);

    assert_eq!(summary(&first), summary(&second));
    assert_eq!(first.metadata(), second.metadata());
}

#[parameterized(
    remote = { "remote-kvm.log" },
    local = { "local-chroot-failed.log" },
)]
fn test_reparsing_joined_lines_is_stable(name: &str) {
    let first = BuildLog::parse(fixture(name));
    let joined = first.lines().collect::<Vec<_>>().join("\n");
    let second = BuildLog::parse(joined);

    assert_eq!(first.segments(), second.segments());
    assert_eq!(first.metadata(), second.metadata());
}

#[test]
fn test_log_without_timestamps_has_zero_durations() {
    let log = BuildLog::parse("plain output\nerror: something broke\nmore output\n");

    assert_eq!(log.segments().len(), 1);
    let header = &log.segments()[0];
    assert_eq!(header.phase(), Phase::Header);
    assert_eq!(header.duration(), 0);
    assert!(!header.succeeded());
}

#[test]
fn test_out_of_order_signatures_are_ignored() {
    // A preinstall line after the build started must not pull the log backwards.
    let log = BuildLog::parse(
        "[1s] start\n\
         [2s] -----------------------------------------------------------------\n\
         [3s] [1/1] preinstalling late\n\
         [4s] done\n",
    );

    let phases: Vec<Phase> = log.segments().iter().map(|s| s.phase()).collect();
    assert_eq!(phases, vec![Phase::Header, Phase::Build]);
    assert_eq!(log.segment(Phase::Build).unwrap().lines().len(), 3);
}

#[test]
fn test_summary_only_fails_from_earlier_errors() {
    let clean = BuildLog::parse("[1s] build\n[2s] finished \"build foo.spec\"\n");
    assert!(clean.segment(Phase::Summary).unwrap().succeeded());

    let dirty = BuildLog::parse("[1s] FAILED tests\n[2s] finished \"build foo.spec\"\n");
    assert!(!dirty.segment(Phase::Header).unwrap().succeeded());
    assert!(!dirty.segment(Phase::Summary).unwrap().succeeded());
}
