// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// The verified install state machine.
pub mod install;
/// Enumerate installed skills and check each against an index.
pub mod list;
/// Read/write the install metadata sidecar.
mod metadata;
/// Shared option and outcome types.
pub mod options;
/// Config-preserving update.
pub mod update;
/// Config-backing-up uninstall.
pub mod uninstall;

pub use install::install;
pub use list::{check_for_update, list};
pub use options::{
    FetchArchive, InstallOptions, InstallOutcome, InstalledEntry, UninstallOutcome, UpdateCheck, UpdateOutcome,
};
pub use uninstall::{restore_backup, uninstall};
pub use update::update;
