// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output rendering shared by both binaries: a plain `text` form for a
//! human at a terminal, and a `json` form for scripting.

use kithkit_core::TrustLevel;
use kithkit_install::InstalledEntry;
use kithkit_screen::{LintResult, SelfTestSummary};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which shape to render command output in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable plain text (the default).
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected 'text' or 'json')")),
        }
    }
}

/// Render a human-facing label for a [`TrustLevel`]. `kithkit-core` does not
/// carry a `Display` impl for this type (it is catalog-internal metadata,
/// not user-facing text), so the CLI formats it by hand.
#[must_use]
pub fn trust_level_label(level: TrustLevel) -> &'static str {
    match level {
        TrustLevel::FirstParty => "first-party",
        TrustLevel::Verified => "verified",
        TrustLevel::Community => "community",
    }
}

fn render<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce() -> String) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}")),
        OutputFormat::Text => text(),
    }
}

/// Render search hits.
pub fn format_search_hits(format: OutputFormat, hits: &[kithkit_catalog::SearchHit]) -> String {
    render(format, &hits, || {
        if hits.is_empty() {
            return "no matching skills".to_string();
        }
        let mut lines = Vec::with_capacity(hits.len());
        for hit in hits {
            lines.push(format!(
                "{name}@{latest}  [{trust}]  {description}",
                name = hit.name,
                latest = hit.latest,
                trust = trust_level_label(hit.trust_level),
                description = hit.description
            ));
        }
        lines.join("\n")
    })
}

/// Render the installed-skill table produced by `kithkit list`.
pub fn format_installed_entries(format: OutputFormat, entries: &[InstalledEntry]) -> String {
    #[derive(Serialize)]
    struct Row<'a> {
        name: &'a str,
        version: &'a str,
        trust_level: &'static str,
        has_update: bool,
        latest_version: &'a Option<String>,
    }
    let rows: Vec<Row<'_>> = entries
        .iter()
        .map(|e| Row {
            name: &e.name,
            version: &e.version,
            trust_level: trust_level_label(e.trust_level),
            has_update: e.has_update,
            latest_version: &e.latest_version,
        })
        .collect();

    render(format, &rows, || {
        if entries.is_empty() {
            return "no skills installed".to_string();
        }
        entries
            .iter()
            .map(|e| {
                let update_note = if e.has_update {
                    format!(" (update available: {})", e.latest_version.as_deref().unwrap_or("?"))
                } else {
                    String::new()
                };
                format!("{}@{} [{}]{}", e.name, e.version, trust_level_label(e.trust_level), update_note)
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// Render a [`LintResult`] from `kithkit-catalog lint`.
pub fn format_lint_result(format: OutputFormat, result: &LintResult) -> String {
    #[derive(Serialize)]
    struct Report<'a> {
        pass: bool,
        score: &'a kithkit_screen::Score,
        duration_ms: u64,
        findings: Vec<&'a kithkit_core::Finding>,
    }
    let report =
        Report { pass: result.pass, score: &result.score, duration_ms: result.duration_ms, findings: result.all_findings().collect() };

    render(format, &report, || {
        let mut lines = vec![format!(
            "{} ({} error, {} warning, {} info, {}ms)",
            if result.pass { "PASS" } else { "FAIL" },
            result.score.error,
            result.score.warning,
            result.score.info,
            result.duration_ms
        )];
        for (check, findings) in &result.checks {
            for finding in findings {
                lines.push(format!("  [{check}] {:?}: {}", finding.severity, finding.message));
            }
        }
        lines.join("\n")
    })
}

/// Render a [`SelfTestSummary`] from `kithkit selftest`.
pub fn format_selftest_summary(format: OutputFormat, summary: &SelfTestSummary) -> String {
    render(format, summary, || {
        let mut lines = vec![format!(
            "{}/{} required thresholds met over {} adversarial cases",
            summary.tiers.iter().filter(|t| t.meets_threshold).count(),
            summary.tiers.len(),
            summary.total
        )];
        for tier in &summary.tiers {
            lines.push(format!(
                "  {}: {}/{} caught ({:.0}%){}",
                tier.tier.label(),
                tier.caught,
                tier.total,
                tier.catch_rate * 100.0,
                if tier.meets_threshold { "" } else { " BELOW THRESHOLD" }
            ));
        }
        for rec in &summary.recommendations {
            lines.push(format!("  - {rec}"));
        }
        lines.join("\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitive_format_names() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("Text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn trust_level_label_is_kebab_case() {
        assert_eq!(trust_level_label(TrustLevel::FirstParty), "first-party");
        assert_eq!(trust_level_label(TrustLevel::Community), "community");
    }

    #[test]
    fn empty_search_hits_render_a_friendly_text_message() {
        assert_eq!(format_search_hits(OutputFormat::Text, &[]), "no matching skills");
    }

    #[test]
    fn empty_search_hits_render_as_json_array() {
        assert_eq!(format_search_hits(OutputFormat::Json, &[]), "[]");
    }
}
