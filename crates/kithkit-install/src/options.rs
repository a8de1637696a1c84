// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared option and outcome types for the install/update/uninstall/list
//! operations.

use kithkit_core::{SignedCatalogIndex, SignedRevocationList, TrustLevel};
use kithkit_sign::VerifyingKey;
use std::path::PathBuf;

/// Caller-injected archive fetch. Takes the `SkillVersion.archive` path and
/// returns the raw archive bytes, or an opaque failure message that becomes
/// `KithkitError::Fetch`.
///
/// HTTP transport is an external collaborator's concern (spec §1); this
/// crate only defines the seam.
pub trait FetchArchive {
    /// Fetch the archive bytes named by `archive_path`.
    ///
    /// # Errors
    ///
    /// Any `Err` is wrapped as `KithkitError::Fetch`.
    fn fetch(&mut self, archive_path: &str) -> Result<Vec<u8>, String>;
}

impl<F: FnMut(&str) -> Result<Vec<u8>, String>> FetchArchive for F {
    fn fetch(&mut self, archive_path: &str) -> Result<Vec<u8>, String> {
        self(archive_path)
    }
}

/// Parameters for [`crate::install::install`].
pub struct InstallOptions<'a> {
    /// Skill name to install.
    pub name: &'a str,
    /// Requested version; `None` installs the index's `latest`.
    pub version: Option<&'a str>,
    /// Root directory all skills are installed beneath.
    pub skills_dir: PathBuf,
    /// A verified catalog index (callers verify before calling this).
    pub index: &'a SignedCatalogIndex,
    /// A verified revocation list, if the caller has one available.
    pub revocations: Option<&'a SignedRevocationList>,
    /// Authority public key, used to verify the archive's signature.
    pub public_key: &'a VerifyingKey,
    /// Recorded verbatim into `InstallMetadata.source` (a URL or local path,
    /// opaque to this crate).
    pub source: String,
    /// The config filename this skill uses, if any (e.g. `config.json`).
    /// Only consulted by [`crate::update::update`] and
    /// [`crate::uninstall::uninstall`]; `install` never creates it — config
    /// generation is an external collaborator's job.
    pub config_filename: Option<String>,
}

/// The outcome of a successful install.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Directory the skill was extracted into.
    pub install_dir: PathBuf,
    /// The metadata written as the commit marker.
    pub metadata: kithkit_core::InstallMetadata,
}

/// The outcome of [`crate::update::update`].
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// Already at the index's `latest`; nothing was done.
    AlreadyUpToDate {
        /// The version that was already installed.
        version: String,
    },
    /// Reinstalled onto a newer version, with the config file (if any)
    /// preserved.
    Updated {
        /// Version installed before the update.
        previous_version: String,
        /// The successful reinstall.
        outcome: InstallOutcome,
    },
}

/// The outcome of [`crate::uninstall::uninstall`].
#[derive(Debug, Clone)]
pub struct UninstallOutcome {
    /// Whether a config file existed and was backed up.
    pub config_backed_up: bool,
}

/// One row of [`crate::list::list`].
#[derive(Debug, Clone)]
pub struct InstalledEntry {
    /// Skill name (the install directory's basename).
    pub name: String,
    /// Installed version.
    pub version: String,
    /// Trust level recorded at install time.
    pub trust_level: TrustLevel,
    /// Whether a newer `latest` exists in the supplied index.
    pub has_update: bool,
    /// The index's `latest` version string, if the skill is still listed.
    pub latest_version: Option<String>,
}

/// The result of [`crate::list::check_for_update`].
#[derive(Debug, Clone)]
pub struct UpdateCheck {
    /// Skill name checked.
    pub name: String,
    /// Installed version, if any.
    pub installed_version: Option<String>,
    /// The index's `latest`, if the skill is present in it.
    pub latest_version: Option<String>,
    /// `true` iff both versions are known and differ.
    pub has_update: bool,
}
