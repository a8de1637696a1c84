// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]

//! The error taxonomy every kithkit operation returns.
//!
//! Verification failures are never recovered: callers get a structured
//! [`KithkitError`] and abort, they never see a panic. Expected "business"
//! outcomes — [`KithkitError::NotFound`], [`KithkitError::Revoked`],
//! [`KithkitError::AlreadyInstalled`], [`KithkitError::NotInstalled`] — are
//! still modeled as error variants, structured results rather than
//! exceptions; callers are expected to match on them instead of treating
//! every `Err` as a hard failure.

use crate::revocation::Severity;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, KithkitError>;

/// The taxonomy from spec §7 — one variant per category, each carrying
/// enough detail for a CLI to print "the most specific message available".
#[derive(Debug, thiserror::Error)]
pub enum KithkitError {
    /// Malformed input: bad semver, bad name, bad YAML, bad base64 key.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Skill or version absent from the index.
    #[error("not found: {0}")]
    NotFound(String),

    /// Hash mismatch or signature verification failure.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    /// The requested skill/version is present in a verified revocation list.
    #[error("{name}@{version} is revoked ({severity}): {reason}")]
    Revoked {
        /// Skill name.
        name: String,
        /// Skill version.
        version: String,
        /// Human-readable reason the entry was revoked.
        reason: String,
        /// Severity of the revocation.
        severity: Severity,
    },

    /// Install metadata already records the requested version.
    #[error("{name}@{version} is already installed")]
    AlreadyInstalled {
        /// Skill name.
        name: String,
        /// Already-installed version.
        version: String,
    },

    /// Archive extraction aborted: path traversal, truncated archive, or a
    /// malformed tar header.
    #[error("extract failed: {0}")]
    Extract(String),

    /// The caller-supplied fetch callback returned an error.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Local filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Uninstall or update attempted on a skill with no install metadata.
    #[error("not installed: {0}")]
    NotInstalled(String),
}

impl KithkitError {
    /// Build an [`KithkitError::Integrity`] with a message guaranteed to
    /// mention "hash" and "integrity" — the two words the spec's tamper-
    /// rejection scenario (§8, scenario 2) requires callers be able to grep
    /// for.
    #[must_use]
    pub fn hash_mismatch(expected: &str, actual: &str) -> Self {
        Self::Integrity(format!(
            "sha256 hash mismatch (integrity check failed): expected {expected}, got {actual}"
        ))
    }

    /// Build an [`KithkitError::Integrity`] for a failed signature check.
    #[must_use]
    pub fn bad_signature(context: &str) -> Self {
        Self::Integrity(format!("signature verification failed (integrity check failed): {context}"))
    }
}
