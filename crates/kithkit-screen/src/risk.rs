// SPDX-License-Identifier: MIT OR Apache-2.0
//! Severity aggregation over a set of review findings, and a trust-level-
//! parameterized recommendation string.

use crate::detector::ReviewFinding;
use kithkit_core::{Severity, TrustLevel};

/// `risk = max severity across findings`; `None` if `findings` is empty.
#[must_use]
pub fn aggregate_risk(findings: &[ReviewFinding]) -> Option<Severity> {
    findings.iter().map(|f| f.severity).max()
}

/// Build the recommendation text for a risk/trust-level combination.
///
/// Any [`Severity::Critical`] finding produces a "do not install"
/// recommendation regardless of trust level. With no findings at all, a
/// first-party or verified skill is "safe to install"; a community skill
/// (or one with no recorded trust level) is asked to confirm and run the
/// self-test harness first. Any other non-empty, non-critical risk is
/// surfaced for manual review before installing.
#[must_use]
pub fn recommend(risk: Option<Severity>, trust_level: Option<TrustLevel>) -> String {
    match risk {
        Some(Severity::Critical) => {
            "do not install: at least one critical-severity finding is present".to_string()
        }
        Some(severity) => {
            format!("review the findings before installing ({severity} risk present)")
        }
        None => match trust_level {
            Some(TrustLevel::FirstParty | TrustLevel::Verified) => "safe to install".to_string(),
            Some(TrustLevel::Community) | None => {
                "no findings, but this is a community skill: confirm the publisher and run \
                 the self-test harness before installing"
                    .to_string()
            }
        },
    }
}
