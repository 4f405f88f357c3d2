//! Build identity extraction from log header lines

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Project name reported for builds run through a local `osc build`
pub const LOCAL_PROJECT: &str = "local";

/// Package, project, distribution and architecture a log belongs to.
///
/// Fields stay empty when the log never names them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    pub name: String,
    pub project: String,
    pub distro: String,
    pub arch: String,
}

impl BuildMetadata {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.project.is_empty()
            && !self.distro.is_empty()
            && !self.arch.is_empty()
    }
}

fn remote_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Building (\S+) for project '(\S+)' repository '(\S+)' arch '(\S+)'")
            .expect("valid regex")
    })
}

fn local_started() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"started "build (\S+)\.spec""#).expect("valid regex"))
}

fn build_root() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"BUILD_ROOT=\S*/([^/\s]+)-(x86_64|i[3-6]86|aarch64|armv\d+[a-z]*|ppc64le|ppc64|ppc|s390x|riscv64|loongarch64|m68k)/?(?:\s|$)",
        )
        .expect("valid regex")
    })
}

/// Fills [`BuildMetadata`] line by line.
///
/// The first value seen for a field wins. A local `started "build ..."` line
/// only names the package; the project falls back to [`LOCAL_PROJECT`] when
/// no remote `Building ... for project` header shows up, since remote
/// workers print a `started` line as well.
#[derive(Debug, Default)]
pub struct MetadataExtractor {
    metadata: BuildMetadata,
    saw_local_start: bool,
}

fn fill(slot: &mut String, value: &str) {
    if slot.is_empty() {
        *slot = value.to_string();
    }
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, line: &str) {
        if self.metadata.is_complete() {
            return;
        }

        let meta = &mut self.metadata;
        if let Some(caps) = remote_header().captures(line) {
            fill(&mut meta.name, &caps[1]);
            fill(&mut meta.project, &caps[2]);
            fill(&mut meta.distro, &caps[3]);
            fill(&mut meta.arch, &caps[4]);
        } else if let Some(caps) = local_started().captures(line) {
            fill(&mut meta.name, &caps[1]);
            self.saw_local_start = true;
        } else if let Some(caps) = build_root().captures(line) {
            fill(&mut meta.distro, &caps[1]);
            fill(&mut meta.arch, &caps[2]);
        }
    }

    pub fn finish(mut self) -> BuildMetadata {
        if self.saw_local_start {
            fill(&mut self.metadata.project, LOCAL_PROJECT);
        }
        self.metadata
    }
}

/// Extracts metadata from a whole log in one call
pub fn extract(raw: &str) -> BuildMetadata {
    let mut extractor = MetadataExtractor::new();
    for line in raw.lines() {
        extractor.observe(line);
    }
    extractor.finish()
}
