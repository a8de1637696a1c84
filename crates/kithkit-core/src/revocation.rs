// SPDX-License-Identifier: MIT OR Apache-2.0
//! Revocation entries and the signed revocation list.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a revocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Lowest severity.
    Low,
    /// Notable but not urgent.
    Medium,
    /// Should be acted on promptly.
    High,
    /// Must not be installed under any circumstance.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// `(name, version)` pair clients must refuse to install, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RevocationEntry {
    /// Skill name.
    pub name: String,
    /// Revoked version.
    pub version: String,
    /// Human-readable reason.
    pub reason: String,
    /// When the revocation was recorded.
    pub revoked_at: chrono::DateTime<chrono::Utc>,
    /// Severity of the revocation.
    pub severity: Severity,
}

/// A signed, sorted list of [`RevocationEntry`] records.
///
/// Invariant: `entries` are sorted by `(name, version)` and `signature` is
/// the Ed25519 signature over the canonical JSON of the sorted array.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SignedRevocationList {
    /// Sorted revocation entries.
    pub entries: Vec<RevocationEntry>,
    /// Base64 Ed25519 signature over the canonical JSON of `entries`.
    pub signature: String,
}

impl SignedRevocationList {
    /// Exact match on `(name, version)`. Per spec §8:
    /// `is_revoked(L, n, v)` is true iff `(n, v) ∈ L.entries`.
    #[must_use]
    pub fn is_revoked(&self, name: &str, version: &str) -> bool {
        self.find(name, version).is_some()
    }

    /// The matching entry, if any.
    #[must_use]
    pub fn find(&self, name: &str, version: &str) -> Option<&RevocationEntry> {
        self.entries.iter().find(|e| e.name == name && e.version == version)
    }
}
