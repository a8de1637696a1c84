// SPDX-License-Identifier: MIT OR Apache-2.0
//! The signed catalog index: skill entries, versions, and search
//! projections.

use crate::manifest::{Author, Capabilities, TrustLevel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One published archive of a skill.
///
/// Invariant: `sha256` is the SHA-256 of the archive bytes, and `signature`
/// is the Ed25519 signature (by the authority key) over those 32 hash
/// bytes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SkillVersion {
    /// Semver string for this version.
    pub version: String,
    /// Archive path, `archives/{skill-name}/{skill-name}-{version}.tar.gz`.
    pub archive: String,
    /// Hex-encoded SHA-256 of the archive bytes.
    pub sha256: String,
    /// Base64 Ed25519 signature over the 32 raw sha256 bytes.
    pub signature: String,
    /// Archive size in bytes.
    pub size: u64,
    /// Publication timestamp.
    pub published: chrono::DateTime<chrono::Utc>,
}

/// One skill and all of its published versions.
///
/// Invariant: `latest` is a key of `versions`. `capabilities` and `tags`
/// are sorted in the persisted form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SkillEntry {
    /// Skill name.
    pub name: String,
    /// Description, derived from the manifest of the `latest` version.
    pub description: String,
    /// Author, derived from the manifest of the `latest` version.
    pub author: Author,
    /// Capabilities, derived from the manifest of the `latest` version.
    pub capabilities: Capabilities,
    /// Tags, derived from the manifest of the `latest` version (sorted).
    pub tags: Vec<String>,
    /// Category, derived from the manifest of the `latest` version.
    pub category: Option<String>,
    /// Catalog-assigned trust tier.
    pub trust_level: TrustLevel,
    /// The version string considered "latest" (lexical string maximum —
    /// see the caveat on [`crate::CATALOG_INDEX_VERSION`] siblings in
    /// `kithkit-catalog`).
    pub latest: String,
    /// All published versions, keyed by version string.
    pub versions: BTreeMap<String, SkillVersion>,
}

impl SkillEntry {
    /// The [`SkillVersion`] referenced by `latest`, if present.
    ///
    /// # Panics
    ///
    /// Never panics; returns `None` if the `latest` invariant has somehow
    /// been violated rather than unwrapping.
    #[must_use]
    pub fn latest_version(&self) -> Option<&SkillVersion> {
        self.versions.get(&self.latest)
    }

    /// Sort `capabilities` and `tags` in place, matching the persisted-form
    /// invariant from spec §3.
    pub fn normalize(&mut self) {
        self.capabilities.required.sort();
        self.capabilities.optional.sort();
        self.tags.sort();
    }
}

/// The top-level signed index.
///
/// Invariant: `signature` is the Ed25519 signature over the canonical JSON
/// of `{version, updated, skills}` (the object minus `signature`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SignedCatalogIndex {
    /// Schema version; always [`crate::CATALOG_INDEX_VERSION`].
    pub version: u32,
    /// When the index was last (re)built or incrementally updated.
    pub updated: chrono::DateTime<chrono::Utc>,
    /// All published skills, sorted by name.
    pub skills: Vec<SkillEntry>,
    /// Base64 Ed25519 signature over the canonical JSON of the body.
    pub signature: String,
}

impl SignedCatalogIndex {
    /// Look up a skill by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SkillEntry> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// Look up a skill by name, mutably.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut SkillEntry> {
        self.skills.iter_mut().find(|s| s.name == name)
    }

    /// Look up a specific `(name, version)` pair's [`SkillVersion`].
    #[must_use]
    pub fn find_version(&self, name: &str, version: &str) -> Option<&SkillVersion> {
        self.find(name)?.versions.get(version)
    }
}
