// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single-line and multi-line pattern scanning over one text file's
//! content.

use crate::patterns::{compiled, pattern_library, PatternRule};
use kithkit_core::{Finding, FindingSeverity};

/// Build the [`Finding`] for a rule hit at its own fixed severity.
fn finding_for(rule: &PatternRule) -> Finding {
    match rule.severity {
        FindingSeverity::Error => Finding::error(rule.id, rule.description),
        FindingSeverity::Warning => Finding::warning(rule.id, rule.description),
        FindingSeverity::Info => Finding::info(rule.id, rule.description),
    }
}

/// Collapse every run of whitespace (including newlines) to a single
/// space, for multi-line rules that must match across line breaks.
fn normalize_whitespace(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last_was_space = false;
    for ch in content.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

/// Run every pattern library rule against `content` (the full text of
/// `file`, one of `SKILL.md`/`reference.md`/`CHANGELOG.md`/the manifest).
///
/// Single-line rules are tested against every line in turn, producing a
/// finding with a 1-based line number. Multi-line rules are tested once
/// against the whitespace-normalized whole-file content; a multi-line hit
/// is suppressed when a single-line finding with the same `base_id` was
/// already produced for this file, so the same underlying phrase does not
/// double-report just because it also happens to match the multi-line
/// variant.
#[must_use]
pub fn scan_file(file: &str, content: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut single_line_base_ids = std::collections::HashSet::new();

    for (idx, line) in content.lines().enumerate() {
        for rule in pattern_library().iter().filter(|r| !r.multiline) {
            if compiled(rule).is_match(line) {
                single_line_base_ids.insert(rule.base_id);
                findings.push(finding_for(rule).with_file(file).with_line(idx + 1).with_pattern(rule.id));
            }
        }
    }

    let normalized = normalize_whitespace(content);
    for rule in pattern_library().iter().filter(|r| r.multiline) {
        if single_line_base_ids.contains(rule.base_id) {
            continue;
        }
        if compiled(rule).is_match(&normalized) {
            findings.push(finding_for(rule).with_file(file).with_pattern(rule.id));
        }
    }

    findings
}
