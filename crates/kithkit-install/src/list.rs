// SPDX-License-Identifier: MIT OR Apache-2.0
//! Enumerate installed skills and check each against an index.

use crate::metadata;
use crate::options::{InstalledEntry, UpdateCheck};
use kithkit_core::{Result, SignedCatalogIndex};
use std::io;
use std::path::Path;

/// Enumerate non-hidden subdirectories of `skills_dir` that carry readable
/// install metadata. If `index` is supplied, each entry's `has_update` and
/// `latest_version` are attached via [`check_for_update`].
///
/// # Errors
///
/// [`kithkit_core::KithkitError::Io`] for anything other than `skills_dir`
/// simply not existing yet (treated as zero installed skills).
pub fn list(skills_dir: &Path, index: Option<&SignedCatalogIndex>) -> Result<Vec<InstalledEntry>> {
    let mut dirs: Vec<_> = match std::fs::read_dir(skills_dir) {
        Ok(entries) => entries
            .filter_map(std::result::Result::ok)
            .filter(|e| e.path().is_dir())
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    dirs.sort_by_key(std::fs::DirEntry::file_name);

    let mut out = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let name = dir.file_name().to_string_lossy().into_owned();
        let Some(meta) = metadata::read(&dir.path())? else { continue };

        let (has_update, latest_version) = match index {
            Some(idx) => {
                let check = check_for_update(&name, skills_dir, idx);
                (check.has_update, check.latest_version)
            }
            None => (false, None),
        };

        out.push(InstalledEntry { name, version: meta.version, trust_level: meta.trust_level, has_update, latest_version });
    }
    Ok(out)
}

/// Compare the installed version of `name` (if any) against `index`'s
/// `latest` (if the skill is still listed). Always returns a record, even
/// when the skill is not installed or absent from the index — those cases
/// simply report `has_update: false`.
#[must_use]
pub fn check_for_update(name: &str, skills_dir: &Path, index: &SignedCatalogIndex) -> UpdateCheck {
    let installed_version = metadata::read(&skills_dir.join(name)).ok().flatten().map(|m| m.version);
    let latest_version = index.find(name).map(|e| e.latest.clone());
    let has_update = matches!((&installed_version, &latest_version), (Some(i), Some(l)) if i != l);
    UpdateCheck { name: name.to_string(), installed_version, latest_version, has_update }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kithkit_core::{Author, Capabilities, InstallMetadata, SignedCatalogIndex, SkillEntry, SkillVersion, TrustLevel};
    use std::collections::BTreeMap;
    use std::fs;

    fn write_fake_install(skills_dir: &Path, name: &str, version: &str) {
        let dir = skills_dir.join(name);
        fs::create_dir_all(&dir).unwrap();
        let meta = InstallMetadata {
            name: name.into(),
            version: version.into(),
            source: "src".into(),
            sha256: "deadbeef".into(),
            signature: "sig".into(),
            installed_at: Utc::now(),
            trust_level: TrustLevel::Community,
        };
        fs::write(dir.join(kithkit_core::METADATA_FILENAME), meta.to_sidecar_json().unwrap()).unwrap();
    }

    fn index_with_latest(name: &str, latest: &str) -> SignedCatalogIndex {
        let mut versions = BTreeMap::new();
        versions.insert(
            latest.to_string(),
            SkillVersion {
                version: latest.to_string(),
                archive: String::new(),
                sha256: String::new(),
                signature: String::new(),
                size: 0,
                published: Utc::now(),
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
            latest: latest.to_string(),
            versions,
        };
        SignedCatalogIndex { version: 1, updated: Utc::now(), skills: vec![entry], signature: String::new() }
    }

    #[test]
    fn list_skips_hidden_and_metadata_less_directories() {
        let skills_dir = tempfile::tempdir().unwrap();
        write_fake_install(skills_dir.path(), "demo", "1.0.0");
        fs::create_dir_all(skills_dir.path().join(".backups")).unwrap();
        fs::create_dir_all(skills_dir.path().join("not-installed")).unwrap();

        let entries = list(skills_dir.path(), None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "demo");
        assert!(!entries[0].has_update);
    }

    #[test]
    fn list_attaches_update_flag_from_index() {
        let skills_dir = tempfile::tempdir().unwrap();
        write_fake_install(skills_dir.path(), "demo", "1.0.0");
        let index = index_with_latest("demo", "2.0.0");

        let entries = list(skills_dir.path(), Some(&index)).unwrap();
        assert!(entries[0].has_update);
        assert_eq!(entries[0].latest_version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn check_for_update_handles_not_installed_and_not_in_index() {
        let skills_dir = tempfile::tempdir().unwrap();
        let index = index_with_latest("demo", "2.0.0");

        let check = check_for_update("demo", skills_dir.path(), &index);
        assert!(!check.has_update);
        assert_eq!(check.installed_version, None);

        write_fake_install(skills_dir.path(), "other", "1.0.0");
        let check = check_for_update("other", skills_dir.path(), &index);
        assert!(!check.has_update);
        assert_eq!(check.latest_version, None);
    }

    #[test]
    fn missing_skills_dir_returns_empty_list() {
        let entries = list(Path::new("/nonexistent/kithkit/skills"), None).unwrap();
        assert!(entries.is_empty());
    }
}
