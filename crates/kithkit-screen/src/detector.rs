// SPDX-License-Identifier: MIT OR Apache-2.0
//! The pluggable detector interface, plus a reference pattern-based
//! implementation used by both [`crate::selftest`] and the optional
//! pre-install screen.

use crate::patterns::{compiled, pattern_library, PatternRule};
use crate::rubric::RubricCategory;
use crate::scope::scope_check;
use kithkit_core::{Manifest, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many independent patterns corroborate a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// A single weak signal fired.
    Low,
    /// A single strong signal fired.
    Medium,
    /// Two or more independent patterns in the same category fired.
    High,
}

/// One review-style finding: the shape an external review agent's
/// structured output, and this reference detector's output, both produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewFinding {
    /// Which rubric category this finding falls under.
    pub category: RubricCategory,
    /// Severity, normally [`RubricCategory::default_severity`].
    pub severity: Severity,
    /// Human-readable description of what was detected.
    pub description: String,
    /// A snippet (at most 120 characters) of the text that triggered this
    /// finding.
    pub evidence: String,
    /// How many independent signals corroborate this finding.
    pub confidence: Confidence,
}

/// The detector interface: given a manifest and the skill's concatenated
/// textual content, produce zero or more [`ReviewFinding`]s.
///
/// Implementations never execute or interpret `content` as instructions —
/// they only pattern-match over it as inert text.
pub trait Detector {
    /// Run detection over one skill's manifest and content.
    fn detect(&self, manifest: &Manifest, content: &str) -> Vec<ReviewFinding>;
}

/// The reference pattern-based detector: keyword/regex families plus
/// scope-mismatch inference. This is the implementation the self-test
/// harness is scored against, and the one an optional pre-install screen
/// can use when no external reviewing agent is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternDetector;

impl Detector for PatternDetector {
    fn detect(&self, manifest: &Manifest, content: &str) -> Vec<ReviewFinding> {
        detect(manifest, content)
    }
}

/// Which rubric category a matched pattern rule corresponds to.
///
/// The pattern library's three families (prompt-injection, credential-
/// access, exfiltration) don't map one-to-one onto the rubric's eight
/// categories, so individual rule ids are routed by hand.
fn category_for_rule(rule: &PatternRule) -> RubricCategory {
    match rule.id {
        "exfiltration/sudo-chmod-777" => RubricCategory::PermissionEscalation,
        "exfiltration/security-disable" => RubricCategory::SecurityModification,
        id if id.starts_with("credential-access/") => RubricCategory::CredentialAccess,
        id if id.starts_with("prompt-injection/") => RubricCategory::InstructionHiding,
        _ => RubricCategory::DataExfiltration,
    }
}

struct Hit {
    category: RubricCategory,
    description: &'static str,
    evidence: String,
}

/// Run the pattern library directly over `content` (not per-line, unlike
/// [`crate::scanner`]: the detector reasons about the skill as a whole).
fn pattern_hits(content: &str) -> Vec<Hit> {
    let mut seen_ids = std::collections::HashSet::new();
    let mut hits = Vec::new();
    for rule in pattern_library() {
        if !seen_ids.insert(rule.id) {
            continue;
        }
        // Both the single-line and multi-line variant sharing this id get a
        // chance to match; the first one that does wins the evidence.
        let variants = pattern_library().iter().filter(|r| r.id == rule.id);
        let Some((m_start, m_end)) = variants.filter_map(|r| compiled(r).find(content)).map(|m| (m.start(), m.end())).next()
        else {
            continue;
        };
        hits.push(Hit {
            category: category_for_rule(rule),
            description: rule.description,
            evidence: evidence_snippet(content, m_start, m_end),
        });
    }
    hits
}

const EVIDENCE_MAX_CHARS: usize = 120;
const EVIDENCE_CONTEXT_BYTES: usize = 40;

/// Extract a human-readable, `<=120`-char snippet centered on the matched
/// byte range, rounded outward to UTF-8 character boundaries.
fn evidence_snippet(text: &str, start: usize, end: usize) -> String {
    let lo = floor_boundary(text, start.saturating_sub(EVIDENCE_CONTEXT_BYTES));
    let hi = ceil_boundary(text, (end + EVIDENCE_CONTEXT_BYTES).min(text.len()));
    let snippet: String = text[lo..hi].split_whitespace().collect::<Vec<_>>().join(" ");
    if snippet.chars().count() > EVIDENCE_MAX_CHARS {
        let truncated: String = snippet.chars().take(EVIDENCE_MAX_CHARS - 3).collect();
        format!("{truncated}...")
    } else {
        snippet
    }
}

fn floor_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_boundary(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Run the reference pattern-based detector over one skill's manifest and
/// concatenated textual content.
///
/// Confidence for each finding is [`Confidence::High`] when its category
/// accumulated two or more distinct matched rule ids, [`Confidence::Medium`]
/// when the lone match was an error-severity rule, and [`Confidence::Low`]
/// otherwise.
#[must_use]
pub fn detect(manifest: &Manifest, content: &str) -> Vec<ReviewFinding> {
    let hits = pattern_hits(content);

    let mut by_category: BTreeMap<RubricCategory, Vec<&Hit>> = BTreeMap::new();
    for hit in &hits {
        by_category.entry(hit.category).or_default().push(hit);
    }

    let mut findings = Vec::new();
    for (category, category_hits) in &by_category {
        let confidence = if category_hits.len() >= 2 { Confidence::High } else { Confidence::Medium };
        for hit in category_hits {
            findings.push(ReviewFinding {
                category: *category,
                severity: category.default_severity(),
                description: hit.description.to_string(),
                evidence: hit.evidence.clone(),
                confidence,
            });
        }
    }

    for finding in scope_check(manifest, content) {
        findings.push(ReviewFinding {
            category: RubricCategory::ScopeMismatch,
            severity: RubricCategory::ScopeMismatch.default_severity(),
            description: finding.message.clone(),
            evidence: evidence_snippet(&finding.message, 0, finding.message.len()),
            confidence: Confidence::Medium,
        });
    }

    findings
}
