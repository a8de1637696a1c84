// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// On-disk TTL cache for a fetched index.
pub mod cache;
/// Shared error type for this crate.
pub mod error;
/// Build, update, and verify the signed catalog index.
pub mod index;
/// Build, verify, and cross-reference the signed revocation list.
pub mod revocation;
/// Filtered search over a verified index.
pub mod search;

pub use cache::IndexCache;
pub use error::CatalogError;
pub use index::{build_index, update_index, verify_index};
pub use revocation::{check_installed, create_revocation_list, verify_revocation_list, InstalledSkill};
pub use search::{search, SearchHit, SearchQuery};
