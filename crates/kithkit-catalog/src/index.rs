// SPDX-License-Identifier: MIT OR Apache-2.0
//! Build, incrementally update, and verify the signed catalog index.

use crate::error::CatalogError;
use chrono::{DateTime, Utc};
use kithkit_archive::extract_parsed_manifest;
use kithkit_core::{SignedCatalogIndex, SkillEntry, SkillVersion, TrustLevel, CATALOG_INDEX_VERSION};
use kithkit_sign::{canonical_json_bytes, hex, sha256_bytes, sign_bytes, verify_bytes, SigningKey, VerifyingKey};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// The signed payload shape, used for both signing and verification so the
/// two sides can never drift from each other.
#[derive(Serialize)]
struct IndexBody<'a> {
    version: u32,
    updated: DateTime<Utc>,
    skills: &'a [SkillEntry],
}

/// Build a fresh signed index from every skill subdirectory of
/// `archives_dir`.
///
/// Each immediate subdirectory of `archives_dir` is treated as one skill
/// (named after the directory); every `*.tar.gz` file inside it is one
/// published version. A subdirectory with no archives in it is skipped.
/// Newly discovered skills are assigned [`TrustLevel::Community`] — trust
/// is promoted later by the catalog authority, never claimed at build time.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if `archives_dir` or an archive cannot be
/// read, or [`CatalogError::Manifest`] if an archive's manifest is missing
/// or unparsable.
pub fn build_index(
    archives_dir: &Path,
    private_key: &SigningKey,
    timestamp: DateTime<Utc>,
) -> Result<SignedCatalogIndex, CatalogError> {
    let mut skill_dirs: Vec<_> = fs::read_dir(archives_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .collect();
    skill_dirs.sort_by_key(std::fs::DirEntry::file_name);

    let mut skills = Vec::with_capacity(skill_dirs.len());
    for dir_entry in skill_dirs {
        let skill_name = dir_entry.file_name().to_string_lossy().into_owned();
        if let Some(entry) = build_skill_entry(&dir_entry.path(), &skill_name, private_key, timestamp)? {
            skills.push(entry);
        }
    }
    skills.sort_by(|a, b| a.name.cmp(&b.name));

    sign_index(skills, timestamp, private_key)
}

fn build_skill_entry(
    dir: &Path,
    skill_name: &str,
    private_key: &SigningKey,
    published: DateTime<Utc>,
) -> Result<Option<SkillEntry>, CatalogError> {
    let mut archive_paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(ARCHIVE_SUFFIX)))
        .collect();
    archive_paths.sort();

    let mut versions = BTreeMap::new();
    let mut latest_manifest = None;

    for path in &archive_paths {
        let bytes = fs::read(path)?;
        let manifest = extract_parsed_manifest(&bytes)
            .map_err(|e| CatalogError::Manifest(skill_name.to_string(), e.to_string()))?;
        let digest = sha256_bytes(&bytes);
        let basename = path.file_name().unwrap().to_string_lossy();

        versions.insert(
            manifest.version.clone(),
            SkillVersion {
                version: manifest.version.clone(),
                archive: format!("archives/{skill_name}/{basename}"),
                sha256: hex(&digest),
                signature: sign_bytes(&digest, private_key),
                size: bytes.len() as u64,
                published,
            },
        );

        // Lexical `String` comparison, not semver-aware ordering: "9.0.0" <
        // "10.0.0" here. Deliberate, not an oversight.
        if latest_manifest.as_ref().is_none_or(|m: &kithkit_core::Manifest| manifest.version > m.version) {
            latest_manifest = Some(manifest);
        }
    }

    let Some(manifest) = latest_manifest else { return Ok(None) };
    let mut entry = SkillEntry {
        name: skill_name.to_string(),
        description: manifest.description,
        author: manifest.author,
        capabilities: manifest.capabilities,
        tags: manifest.tags,
        category: manifest.category,
        trust_level: TrustLevel::Community,
        latest: manifest.version,
        versions,
    };
    entry.normalize();
    Ok(Some(entry))
}

/// Insert or replace the single version carried by `archive_bytes` into
/// `existing`, then re-sign. `latest` and the skill-level metadata are
/// re-derived from this archive's manifest only if its version is the
/// lexically-greatest one the skill now carries; signing an older version
/// never regresses an already-newer `latest`.
///
/// Every other version's stored [`SkillVersion`] — including its
/// signature — is carried over verbatim. A brand-new skill name is
/// inserted with [`TrustLevel::Community`]; an existing skill keeps its
/// current trust level untouched (trust promotion is a separate,
/// authority-only operation this function does not perform).
///
/// # Errors
///
/// Returns [`CatalogError::Manifest`] if `archive_bytes` has no readable
/// manifest.
pub fn update_index(
    existing: &SignedCatalogIndex,
    archive_bytes: &[u8],
    private_key: &SigningKey,
    timestamp: DateTime<Utc>,
) -> Result<SignedCatalogIndex, CatalogError> {
    let manifest = extract_parsed_manifest(archive_bytes)
        .map_err(|e| CatalogError::Manifest("<new archive>".to_string(), e.to_string()))?;
    let digest = sha256_bytes(archive_bytes);
    let version = SkillVersion {
        version: manifest.version.clone(),
        archive: format!("archives/{}/{}-{}.tar.gz", manifest.name, manifest.name, manifest.version),
        sha256: hex(&digest),
        signature: sign_bytes(&digest, private_key),
        size: archive_bytes.len() as u64,
        published: timestamp,
    };

    let mut skills = existing.skills.clone();
    match skills.iter_mut().find(|s| s.name == manifest.name) {
        Some(entry) => {
            entry.versions.insert(version.version.clone(), version);
            // Only the lexically-greatest version's manifest drives
            // `latest` and the skill-level metadata — re-signing an older
            // version must not regress an already-newer `latest`.
            if manifest.version >= entry.latest {
                entry.latest = manifest.version.clone();
                entry.description = manifest.description;
                entry.author = manifest.author;
                entry.capabilities = manifest.capabilities;
                entry.tags = manifest.tags;
                entry.category = manifest.category;
            }
            entry.normalize();
        }
        None => {
            let mut versions = BTreeMap::new();
            versions.insert(version.version.clone(), version);
            let mut entry = SkillEntry {
                name: manifest.name,
                description: manifest.description,
                author: manifest.author,
                capabilities: manifest.capabilities,
                tags: manifest.tags,
                category: manifest.category,
                trust_level: TrustLevel::Community,
                latest: manifest.version,
                versions,
            };
            entry.normalize();
            skills.push(entry);
        }
    }
    skills.sort_by(|a, b| a.name.cmp(&b.name));

    sign_index(skills, timestamp, private_key)
}

/// Strip `signature`, canonicalize the remainder, and Ed25519-verify.
#[must_use]
pub fn verify_index(signed: &SignedCatalogIndex, public_key: &VerifyingKey) -> bool {
    let body = IndexBody { version: signed.version, updated: signed.updated, skills: &signed.skills };
    match canonical_json_bytes(&body) {
        Ok(bytes) => verify_bytes(&bytes, &signed.signature, public_key),
        Err(_) => false,
    }
}

fn sign_index(
    skills: Vec<SkillEntry>,
    updated: DateTime<Utc>,
    private_key: &SigningKey,
) -> Result<SignedCatalogIndex, CatalogError> {
    let body = IndexBody { version: CATALOG_INDEX_VERSION, updated, skills: &skills };
    let bytes = canonical_json_bytes(&body)?;
    let signature = sign_bytes(&bytes, private_key);
    Ok(SignedCatalogIndex { version: CATALOG_INDEX_VERSION, updated, skills, signature })
}
