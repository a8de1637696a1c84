// SPDX-License-Identifier: MIT OR Apache-2.0
//! Aggregate every check into one [`LintResult`].

use crate::naming::naming_check;
use crate::scanner::scan_file;
use crate::scope::scope_check;
use crate::structure::structure_check;
use crate::unicode::unicode_check;
use kithkit_archive::{list_entries, read_entry};
use kithkit_core::{Finding, FindingSeverity, Manifest};
use std::collections::BTreeMap;
use std::time::Instant;

/// Text files the scanner and unicode check run against, in addition to
/// the manifest itself.
const SCANNED_FILES: &[&str] = &["SKILL.md", "reference.md", "CHANGELOG.md"];

/// Finding counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Score {
    /// Count of [`FindingSeverity::Info`] findings.
    pub info: usize,
    /// Count of [`FindingSeverity::Warning`] findings.
    pub warning: usize,
    /// Count of [`FindingSeverity::Error`] findings.
    pub error: usize,
}

impl Score {
    fn tally(findings: &[Finding]) -> Self {
        let mut score = Score::default();
        for finding in findings {
            match finding.severity {
                FindingSeverity::Info => score.info += 1,
                FindingSeverity::Warning => score.warning += 1,
                FindingSeverity::Error => score.error += 1,
            }
        }
        score
    }
}

/// One named check's findings (e.g. `"scanner"`, `"structure"`).
pub type CheckResults = BTreeMap<String, Vec<Finding>>;

/// The full result of linting one skill archive.
#[derive(Debug, Clone)]
pub struct LintResult {
    /// Findings grouped by the check that produced them.
    pub checks: CheckResults,
    /// `true` iff no finding across every check has severity
    /// [`FindingSeverity::Error`].
    pub pass: bool,
    /// Counts by severity across every check.
    pub score: Score,
    /// Wall-clock duration of the lint run.
    pub duration_ms: u64,
}

impl LintResult {
    /// Every finding across every check, in check-name order.
    pub fn all_findings(&self) -> impl Iterator<Item = &Finding> {
        self.checks.values().flatten()
    }
}

/// Lint one built skill archive: unpack entries in-memory (no disk
/// writes), run structure/manifest/naming/scope/scanner/unicode checks,
/// and aggregate.
///
/// `existing_names` is the set of skill names already in the catalog, for
/// the naming check's typosquat warning.
///
/// # Errors
///
/// [`std::io::Error`] if `archive` is not a valid gzip/tar stream, or its
/// manifest cannot be parsed.
pub fn lint_archive(archive: &[u8], existing_names: &[String]) -> std::io::Result<LintResult> {
    let started = Instant::now();
    let entries = list_entries(archive)?;
    let manifest = kithkit_archive::extract_parsed_manifest(archive)?;

    let mut checks: CheckResults = BTreeMap::new();
    checks.insert("manifest".to_string(), manifest.validate());
    checks.insert("structure".to_string(), structure_check(&entries));
    checks.insert("naming".to_string(), naming_check(&manifest, existing_names));

    let skill_md = read_entry_text(archive, "SKILL.md")?.unwrap_or_default();
    checks.insert("scope".to_string(), scope_check(&manifest, &skill_md));

    let mut scanner_findings = Vec::new();
    let mut unicode_findings = Vec::new();
    for name in SCANNED_FILES {
        let Some(text) = read_entry_text(archive, name)? else { continue };
        scanner_findings.extend(scan_file(name, &text));
        unicode_findings.extend(unicode_check(name, &text));
    }
    checks.insert("scanner".to_string(), scanner_findings);
    checks.insert("unicode".to_string(), unicode_findings);

    let all: Vec<Finding> = checks.values().flatten().cloned().collect();
    let pass = !all.iter().any(|f| f.severity == FindingSeverity::Error);
    let score = Score::tally(&all);
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(LintResult { checks, pass, score, duration_ms })
}

fn read_entry_text(archive: &[u8], basename: &str) -> std::io::Result<Option<String>> {
    let Some(bytes) = read_entry(archive, basename)? else { return Ok(None) };
    String::from_utf8(bytes).map(Some).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
