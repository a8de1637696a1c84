// SPDX-License-Identifier: MIT OR Apache-2.0
//! Screener output: a single [`Finding`] and helpers to build one.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Severity of a single lint/scan finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    /// Informational only; never affects `pass`.
    Info,
    /// Should be reviewed but does not block.
    Warning,
    /// Blocks `pass`.
    Error,
}

/// One structural or pattern-scan finding.
///
/// # Examples
///
/// ```
/// use kithkit_core::{Finding, FindingSeverity};
///
/// let f = Finding::error("manifest/name", "bad name");
/// assert_eq!(f.severity, FindingSeverity::Error);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    /// Severity of this finding.
    pub severity: FindingSeverity,
    /// Which check produced this finding, e.g. `"manifest/name"` or
    /// `"pattern/credential-access"`.
    pub check: String,
    /// Human-readable message.
    pub message: String,
    /// File the finding applies to, relative to the archive root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number within `file`, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// The pattern id that matched, for pattern-scan findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Finding {
    /// Build an [`FindingSeverity::Error`] finding with no file/line/pattern.
    pub fn error(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self { severity: FindingSeverity::Error, check: check.into(), message: message.into(), file: None, line: None, pattern: None }
    }

    /// Build an [`FindingSeverity::Warning`] finding with no file/line/pattern.
    pub fn warning(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self { severity: FindingSeverity::Warning, check: check.into(), message: message.into(), file: None, line: None, pattern: None }
    }

    /// Build an [`FindingSeverity::Info`] finding with no file/line/pattern.
    pub fn info(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self { severity: FindingSeverity::Info, check: check.into(), message: message.into(), file: None, line: None, pattern: None }
    }

    /// Attach a file path.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach a 1-based line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach a pattern id.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}
