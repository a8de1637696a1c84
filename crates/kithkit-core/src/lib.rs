// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error taxonomy shared by every kithkit crate.
pub mod error;
/// Screener-facing finding and report types.
pub mod finding;
/// Per-installed-skill sidecar metadata.
pub mod install;
/// The skill manifest and its structural validation.
pub mod manifest;
/// Signed catalog index, skill entries, and skill versions.
pub mod registry;
/// Signed revocation list.
pub mod revocation;

pub use error::{KithkitError, Result};
pub use finding::{Finding, FindingSeverity};
pub use install::{InstallMetadata, METADATA_FILENAME};
pub use manifest::{Author, Capabilities, ConfigField, ConfigType, Frameworks, Manifest, TrustLevel};
pub use registry::{SignedCatalogIndex, SkillEntry, SkillVersion};
pub use revocation::{RevocationEntry, Severity, SignedRevocationList};

/// The only catalog index schema version this crate understands.
pub const CATALOG_INDEX_VERSION: u32 = 1;
