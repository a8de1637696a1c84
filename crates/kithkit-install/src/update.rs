// SPDX-License-Identifier: MIT OR Apache-2.0
//! Config-preserving update: reinstall onto a newer `latest`.

use crate::install::install;
use crate::metadata;
use crate::options::{FetchArchive, InstallOptions, InstallOutcome, UpdateOutcome};
use kithkit_core::{KithkitError, Result};
use std::fs;

/// Run `checkForUpdate` implicitly: if the installed version already equals
/// the index's `latest`, return [`UpdateOutcome::AlreadyUpToDate`] without
/// touching the filesystem. Otherwise read the existing config file (if
/// `options.config_filename` names one and it exists), remove the install
/// directory, reinstall at `latest`, then restore the preserved config
/// bytes into the new directory.
///
/// The config schema-level merge between an old and new config shape is an
/// external collaborator's job (spec §4.external); this function only
/// guarantees the raw bytes survive if the file existed.
///
/// # Errors
///
/// [`KithkitError::NotInstalled`] if `options.name` has no install metadata;
/// otherwise anything [`install`] can return.
pub fn update(mut options: InstallOptions<'_>, fetch: &mut dyn FetchArchive) -> Result<UpdateOutcome> {
    let install_dir = options.skills_dir.join(options.name);
    let existing = metadata::read(&install_dir)?
        .ok_or_else(|| KithkitError::NotInstalled(options.name.to_string()))?;

    let entry = options
        .index
        .find(options.name)
        .ok_or_else(|| KithkitError::NotFound(format!("skill '{}'", options.name)))?;
    if entry.latest == existing.version {
        return Ok(UpdateOutcome::AlreadyUpToDate { version: existing.version });
    }

    let config_filename = options.config_filename.clone();
    let preserved_config = config_filename.as_ref().and_then(|f| fs::read(install_dir.join(f)).ok());

    fs::remove_dir_all(&install_dir)?;
    options.version = None; // always reinstall onto latest

    let outcome: InstallOutcome = install(options, fetch)?;

    if let (Some(bytes), Some(filename)) = (preserved_config, config_filename) {
        fs::write(outcome.install_dir.join(filename), bytes)?;
    }

    Ok(UpdateOutcome::Updated { previous_version: existing.version, outcome })
}
