// SPDX-License-Identifier: MIT OR Apache-2.0
//! Build, verify, and cross-reference the signed revocation list.

use crate::error::CatalogError;
use kithkit_core::{RevocationEntry, SignedRevocationList};
use kithkit_sign::{canonical_json_bytes, sign_bytes, verify_bytes, SigningKey, VerifyingKey};

/// Sort `entries` by `(name, version)` and sign the canonical JSON array.
///
/// # Errors
///
/// Returns [`CatalogError::Json`] if `entries` cannot be canonicalized.
pub fn create_revocation_list(
    mut entries: Vec<RevocationEntry>,
    private_key: &SigningKey,
) -> Result<SignedRevocationList, CatalogError> {
    entries.sort_by(|a, b| (a.name.as_str(), a.version.as_str()).cmp(&(b.name.as_str(), b.version.as_str())));
    let bytes = canonical_json_bytes(&entries)?;
    let signature = sign_bytes(&bytes, private_key);
    Ok(SignedRevocationList { entries, signature })
}

/// Re-canonicalize `list.entries` and Ed25519-verify against `signature`.
#[must_use]
pub fn verify_revocation_list(list: &SignedRevocationList, public_key: &VerifyingKey) -> bool {
    match canonical_json_bytes(&list.entries) {
        Ok(bytes) => verify_bytes(&bytes, &list.signature, public_key),
        Err(_) => false,
    }
}

/// One locally installed skill, as reported to [`check_installed`].
#[derive(Debug, Clone)]
pub struct InstalledSkill {
    /// Skill name.
    pub name: String,
    /// Installed version.
    pub version: String,
}

/// Cross-reference `installed` against a verified revocation list.
///
/// Purely a report: returns every matching [`RevocationEntry`] and never
/// mutates `installed` or the filesystem. Uninstalling a revoked skill is
/// the caller's decision, made in `kithkit-install`.
#[must_use]
pub fn check_installed<'a>(
    list: &'a SignedRevocationList,
    installed: &[InstalledSkill],
) -> Vec<&'a RevocationEntry> {
    installed.iter().filter_map(|skill| list.find(&skill.name, &skill.version)).collect()
}
