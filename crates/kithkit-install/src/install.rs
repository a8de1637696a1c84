// SPDX-License-Identifier: MIT OR Apache-2.0
//! The verified install state machine: LOCATE → REVOKE → FETCH → VERIFY →
//! DEDUP → EXTRACT → META.

use crate::metadata;
use crate::options::{FetchArchive, InstallOptions, InstallOutcome};
use chrono::Utc;
use kithkit_archive::extract_archive;
use kithkit_core::{InstallMetadata, KithkitError, Result};
use kithkit_sign::{hex, sha256_bytes, verify_bytes};
use std::fs;

/// Install `options.name` at `options.version` (or the index's `latest`)
/// into `options.skills_dir`.
///
/// Every failure path leaves the filesystem either untouched or with only
/// the install directory removed — never a partial tree carrying metadata.
/// Success is atomic from the caller's perspective: the metadata sidecar is
/// the last write.
///
/// # Errors
///
/// - [`KithkitError::NotFound`] — skill or version absent from `index`.
/// - [`KithkitError::Revoked`] — present in `revocations`.
/// - [`KithkitError::Fetch`] — `fetch` failed.
/// - [`KithkitError::Integrity`] — hash or signature mismatch.
/// - [`KithkitError::AlreadyInstalled`] — same version already installed.
/// - [`KithkitError::Extract`] — safe extraction failed.
pub fn install(options: InstallOptions<'_>, fetch: &mut dyn FetchArchive) -> Result<InstallOutcome> {
    let InstallOptions { name, version, skills_dir, index, revocations, public_key, source, .. } = options;

    // LOCATE
    let entry = index.find(name).ok_or_else(|| KithkitError::NotFound(format!("skill '{name}'")))?;
    let version = version.map(str::to_string).unwrap_or_else(|| entry.latest.clone());
    let skill_version = entry
        .versions
        .get(&version)
        .ok_or_else(|| KithkitError::NotFound(format!("{name}@{version}")))?
        .clone();

    // REVOKE
    if let Some(list) = revocations {
        if let Some(hit) = list.find(name, &version) {
            return Err(KithkitError::Revoked {
                name: name.to_string(),
                version,
                reason: hit.reason.clone(),
                severity: hit.severity,
            });
        }
    }

    // FETCH
    let bytes = fetch.fetch(&skill_version.archive).map_err(KithkitError::Fetch)?;

    // VERIFY
    let digest = sha256_bytes(&bytes);
    let actual_hex = hex(&digest);
    if actual_hex != skill_version.sha256 {
        return Err(KithkitError::hash_mismatch(&skill_version.sha256, &actual_hex));
    }
    if !verify_bytes(&digest, &skill_version.signature, public_key) {
        return Err(KithkitError::bad_signature(&format!("{name}@{version}")));
    }

    // DEDUP
    let install_dir = skills_dir.join(name);
    if let Some(existing) = metadata::read(&install_dir)? {
        if existing.version == version {
            return Err(KithkitError::AlreadyInstalled { name: name.to_string(), version });
        }
    }

    // EXTRACT
    if let Err(e) = extract_archive(&bytes, &install_dir) {
        let _ = fs::remove_dir_all(&install_dir);
        return Err(KithkitError::Extract(e.to_string()));
    }

    // META
    let install_metadata = InstallMetadata {
        name: name.to_string(),
        version,
        source,
        sha256: actual_hex,
        signature: skill_version.signature,
        installed_at: Utc::now(),
        trust_level: entry.trust_level,
    };
    metadata::write(&install_dir, &install_metadata)?;

    Ok(InstallOutcome { install_dir, metadata: install_metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::InstallOptions;
    use chrono::Utc as ChronoUtc;
    use kithkit_archive::build_archive;
    use kithkit_core::{Author, Capabilities, SignedCatalogIndex, SkillEntry, SkillVersion, TrustLevel};
    use kithkit_sign::{generate_keypair, sign_bytes};
    use std::collections::BTreeMap;

    fn build_fixture_archive(name: &str, version: &str) -> Vec<u8> {
        let src = tempfile::tempdir().unwrap();
        std::fs::write(
            src.path().join("manifest.yaml"),
            format!("name: {name}\nversion: {version}\ndescription: d\nauthor:\n  name: A\n  github: a\n"),
        )
        .unwrap();
        std::fs::write(src.path().join("SKILL.md"), "# hi").unwrap();
        build_archive(src.path(), name).unwrap()
    }

    fn index_with(name: &str, version: &str, archive: &[u8], sk: &kithkit_sign::SigningKey) -> SignedCatalogIndex {
        let digest = sha256_bytes(archive);
        let mut versions = BTreeMap::new();
        versions.insert(
            version.to_string(),
            SkillVersion {
                version: version.to_string(),
                archive: format!("archives/{name}/{name}-{version}.tar.gz"),
                sha256: hex(&digest),
                signature: sign_bytes(&digest, sk),
                size: archive.len() as u64,
                published: ChronoUtc::now(),
            },
        );
        let entry = SkillEntry {
            name: name.to_string(),
            description: "d".into(),
            author: Author { name: "A".into(), github: "a".into() },
            capabilities: Capabilities::default(),
            tags: vec![],
            category: None,
            trust_level: TrustLevel::Community,
            latest: version.to_string(),
            versions,
        };
        SignedCatalogIndex { version: 1, updated: ChronoUtc::now(), skills: vec![entry], signature: String::new() }
    }

    #[test]
    fn successful_install_writes_metadata() {
        let sk = generate_keypair();
        let archive = build_fixture_archive("demo", "1.0.0");
        let index = index_with("demo", "1.0.0", &archive, &sk);
        let skills_dir = tempfile::tempdir().unwrap();

        let opts = InstallOptions {
            name: "demo",
            version: None,
            skills_dir: skills_dir.path().to_path_buf(),
            index: &index,
            revocations: None,
            public_key: &sk.verifying_key(),
            source: "https://example.test/demo.tar.gz".into(),
            config_filename: None,
        };
        let mut fetch = move |_: &str| Ok(archive.clone());
        let outcome = install(opts, &mut fetch).unwrap();
        assert_eq!(outcome.metadata.version, "1.0.0");
        assert!(outcome.install_dir.join("SKILL.md").exists());
        assert!(outcome.install_dir.join(kithkit_core::METADATA_FILENAME).exists());
    }

    #[test]
    fn tampered_archive_fails_integrity_and_leaves_no_directory() {
        let sk = generate_keypair();
        let archive = build_fixture_archive("demo", "1.0.0");
        let index = index_with("demo", "1.0.0", &archive, &sk);
        let skills_dir = tempfile::tempdir().unwrap();

        let opts = InstallOptions {
            name: "demo",
            version: None,
            skills_dir: skills_dir.path().to_path_buf(),
            index: &index,
            revocations: None,
            public_key: &sk.verifying_key(),
            source: "src".into(),
            config_filename: None,
        };
        let mut fetch = |_: &str| Ok(b"not the real archive".to_vec());
        let err = install(opts, &mut fetch).unwrap_err();
        assert!(matches!(err, KithkitError::Integrity(_)));
        assert!(!skills_dir.path().join("demo").exists());
    }

    #[test]
    fn second_install_of_same_version_fails_dedup() {
        let sk = generate_keypair();
        let archive = build_fixture_archive("demo", "1.0.0");
        let index = index_with("demo", "1.0.0", &archive, &sk);
        let skills_dir = tempfile::tempdir().unwrap();

        let make_opts = || InstallOptions {
            name: "demo",
            version: None,
            skills_dir: skills_dir.path().to_path_buf(),
            index: &index,
            revocations: None,
            public_key: &sk.verifying_key(),
            source: "src".into(),
            config_filename: None,
        };

        let a = archive.clone();
        install(make_opts(), &mut move |_: &str| Ok(a.clone())).unwrap();

        let b = archive.clone();
        let err = install(make_opts(), &mut move |_: &str| Ok(b.clone())).unwrap_err();
        assert!(matches!(err, KithkitError::AlreadyInstalled { .. }));
    }

    #[test]
    fn revoked_version_is_rejected_before_fetch() {
        let sk = generate_keypair();
        let archive = build_fixture_archive("demo", "1.0.0");
        let index = index_with("demo", "1.0.0", &archive, &sk);
        let revocations = kithkit_core::SignedRevocationList {
            entries: vec![kithkit_core::RevocationEntry {
                name: "demo".into(),
                version: "1.0.0".into(),
                reason: "known-malicious".into(),
                revoked_at: ChronoUtc::now(),
                severity: kithkit_core::Severity::Critical,
            }],
            signature: String::new(),
        };
        let skills_dir = tempfile::tempdir().unwrap();
        let opts = InstallOptions {
            name: "demo",
            version: None,
            skills_dir: skills_dir.path().to_path_buf(),
            index: &index,
            revocations: Some(&revocations),
            public_key: &sk.verifying_key(),
            source: "src".into(),
            config_filename: None,
        };
        let mut fetch = |_: &str| panic!("fetch must not be called for a revoked version");
        let err = install(opts, &mut fetch).unwrap_err();
        assert!(matches!(err, KithkitError::Revoked { .. }));
    }
}
