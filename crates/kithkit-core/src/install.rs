// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-installed-skill metadata, written as a hidden sidecar file inside
//! the install directory.

use crate::manifest::TrustLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The sidecar filename written into every install directory. Hidden (dot-
/// prefixed) so `list` operations can distinguish it from user content, and
/// so it is never mistaken for part of the skill itself.
pub const METADATA_FILENAME: &str = ".kithkit-install.json";

/// Commit marker for a successful install. Its presence is what makes an
/// install directory "installed" — see the install state machine in
/// `kithkit-install`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstallMetadata {
    /// Skill name.
    pub name: String,
    /// Installed version.
    pub version: String,
    /// Where the archive was fetched from (a URL or local path, opaque to
    /// this crate).
    pub source: String,
    /// Hex-encoded SHA-256 of the archive that was installed.
    pub sha256: String,
    /// Base64 Ed25519 signature over the archive hash.
    pub signature: String,
    /// When the install completed.
    pub installed_at: chrono::DateTime<chrono::Utc>,
    /// Trust tier at the time of install.
    pub trust_level: TrustLevel,
}

impl InstallMetadata {
    /// Serialize as the deterministic, 2-space pretty-printed JSON the spec
    /// requires for the sidecar file (user-inspectable; not itself signed).
    pub fn to_sidecar_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::KithkitError::Invalid(e.to_string()))
    }
}
