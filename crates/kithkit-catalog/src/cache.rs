// SPDX-License-Identifier: MIT OR Apache-2.0
//! A TTL-bounded on-disk cache for a single fetched catalog index.

use crate::error::CatalogError;
use chrono::{DateTime, TimeDelta, Utc};
use kithkit_core::SignedCatalogIndex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    fetched_at: DateTime<Utc>,
    index: SignedCatalogIndex,
}

/// Caches exactly one [`SignedCatalogIndex`] at a fixed path on disk.
///
/// Caching never substitutes for signature verification: [`IndexCache::get`]
/// hands back whatever bytes are on disk (or freshly fetched), and every
/// caller is expected to re-verify the returned index before trusting it.
pub struct IndexCache {
    path: PathBuf,
    ttl: TimeDelta,
}

impl IndexCache {
    /// Create a cache backed by `path`, considering entries stale after
    /// `ttl` has elapsed since they were fetched.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, ttl: TimeDelta) -> Self {
        Self { path: path.into(), ttl }
    }

    /// Return the cached index if it is still fresh as of `now`. Otherwise
    /// call `fetch_fn`, persist `{fetched_at: now, index}`, and return the
    /// freshly fetched index.
    ///
    /// # Errors
    ///
    /// Propagates `fetch_fn`'s error, or a [`CatalogError`] from reading or
    /// writing the cache file.
    pub fn get<F>(&self, now: DateTime<Utc>, fetch_fn: F) -> Result<SignedCatalogIndex, CatalogError>
    where
        F: FnOnce() -> Result<SignedCatalogIndex, CatalogError>,
    {
        if let Some(envelope) = self.read_envelope()? {
            if now - envelope.fetched_at < self.ttl {
                return Ok(envelope.index);
            }
        }
        let index = fetch_fn()?;
        self.persist(now, &index)?;
        Ok(index)
    }

    /// Remove the cache file. A no-op if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] for any failure other than the file
    /// already being absent.
    pub fn invalidate(&self) -> Result<(), CatalogError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_envelope(&self) -> Result<Option<CacheEnvelope>, CatalogError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, fetched_at: DateTime<Utc>, index: &SignedCatalogIndex) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let envelope = CacheEnvelope { fetched_at, index: index.clone() };
        fs::write(&self.path, serde_json::to_vec(&envelope)?)?;
        Ok(())
    }
}
