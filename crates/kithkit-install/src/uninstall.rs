// SPDX-License-Identifier: MIT OR Apache-2.0
//! Uninstall (with config backup) and backup restoration.

use crate::metadata;
use crate::options::UninstallOutcome;
use kithkit_core::{KithkitError, Result};
use std::fs;
use std::path::Path;

/// Remove an installed skill, backing up its config file first if one
/// exists at `{install_dir}/{config_filename}`.
///
/// # Errors
///
/// [`KithkitError::NotInstalled`] if `install_dir` has no metadata sidecar.
pub fn uninstall(skills_dir: &Path, name: &str, config_filename: Option<&str>) -> Result<UninstallOutcome> {
    let install_dir = skills_dir.join(name);
    metadata::read(&install_dir)?.ok_or_else(|| KithkitError::NotInstalled(name.to_string()))?;

    let mut config_backed_up = false;
    if let Some(filename) = config_filename {
        if let Ok(bytes) = fs::read(install_dir.join(filename)) {
            let backup_dir = skills_dir.join(".backups").join(name);
            fs::create_dir_all(&backup_dir)?;
            fs::write(backup_dir.join("config.bak"), bytes)?;
            config_backed_up = true;
        }
    }

    fs::remove_dir_all(&install_dir)?;
    Ok(UninstallOutcome { config_backed_up })
}

/// Return the backed-up config bytes for `name`, or `None` if no backup
/// exists.
#[must_use]
pub fn restore_backup(skills_dir: &Path, name: &str) -> Option<Vec<u8>> {
    fs::read(skills_dir.join(".backups").join(name).join("config.bak")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kithkit_core::{InstallMetadata, TrustLevel};

    fn write_fake_install(skills_dir: &Path, name: &str) {
        let dir = skills_dir.join(name);
        fs::create_dir_all(&dir).unwrap();
        let meta = InstallMetadata {
            name: name.into(),
            version: "1.0.0".into(),
            source: "src".into(),
            sha256: "deadbeef".into(),
            signature: "sig".into(),
            installed_at: chrono::Utc::now(),
            trust_level: TrustLevel::Community,
        };
        fs::write(dir.join(kithkit_core::METADATA_FILENAME), meta.to_sidecar_json().unwrap()).unwrap();
    }

    #[test]
    fn uninstall_without_metadata_fails_not_installed() {
        let skills_dir = tempfile::tempdir().unwrap();
        let err = uninstall(skills_dir.path(), "ghost", None).unwrap_err();
        assert!(matches!(err, KithkitError::NotInstalled(_)));
    }

    #[test]
    fn uninstall_backs_up_config_and_removes_directory() {
        let skills_dir = tempfile::tempdir().unwrap();
        write_fake_install(skills_dir.path(), "demo");
        fs::write(skills_dir.path().join("demo").join("config.json"), b"secret").unwrap();

        let outcome = uninstall(skills_dir.path(), "demo", Some("config.json")).unwrap();
        assert!(outcome.config_backed_up);
        assert!(!skills_dir.path().join("demo").exists());
        assert_eq!(restore_backup(skills_dir.path(), "demo").unwrap(), b"secret");
    }

    #[test]
    fn uninstall_without_config_file_reports_no_backup() {
        let skills_dir = tempfile::tempdir().unwrap();
        write_fake_install(skills_dir.path(), "demo");

        let outcome = uninstall(skills_dir.path(), "demo", Some("config.json")).unwrap();
        assert!(!outcome.config_backed_up);
        assert!(restore_backup(skills_dir.path(), "demo").is_none());
    }
}
