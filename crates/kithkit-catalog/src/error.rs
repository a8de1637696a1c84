// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors produced by catalog-index and revocation-list operations.

/// Failure modes specific to building, updating, verifying, and caching
/// the catalog index and revocation list.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Filesystem failure while reading archives or the cache file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Canonicalization or cache (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// An archive's `manifest.yaml` could not be extracted or parsed.
    #[error("skill '{0}': invalid manifest: {1}")]
    Manifest(String, String),
}
