// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared, binary-agnostic plumbing: resolving key material, loading and
//! saving the signed index/revocation list, and printing JSON schemas.
//!
//! Kept library-side so it can be exercised without spawning either binary.

use anyhow::{Context, Result};
use kithkit_core::{SignedCatalogIndex, SignedRevocationList};
use kithkit_sign::{decode_private_key, decode_public_key, SigningKey, VerifyingKey};
use schemars::schema_for;
use std::path::Path;

/// Resolve the authority public key used by consumer-side verification.
///
/// Precedence: the `--public-key` flag, then the `KITHKIT_CATALOG_PUBLIC_KEY`
/// environment variable, then `kithkit.toml`'s `public_key` field.
pub fn resolve_public_key(flag: Option<&str>, config: Option<&str>) -> Result<VerifyingKey> {
    let encoded = flag
        .map(ToString::to_string)
        .or_else(|| std::env::var("KITHKIT_CATALOG_PUBLIC_KEY").ok())
        .or_else(|| config.map(ToString::to_string))
        .context("no authority public key: set --public-key, KITHKIT_CATALOG_PUBLIC_KEY, or kithkit.toml's public_key")?;
    decode_public_key(&encoded).context("decode authority public key")
}

/// Resolve the authority private key used by catalog signing operations.
///
/// Precedence: the `--private-key` flag, then `KITHKIT_CATALOG_PRIVATE_KEY`,
/// then `kithkit-catalog.toml`'s `private_key` field.
pub fn resolve_private_key(flag: Option<&str>, config: Option<&str>) -> Result<SigningKey> {
    let encoded = flag
        .map(ToString::to_string)
        .or_else(|| std::env::var("KITHKIT_CATALOG_PRIVATE_KEY").ok())
        .or_else(|| config.map(ToString::to_string))
        .context(
            "no authority private key: set --private-key, KITHKIT_CATALOG_PRIVATE_KEY, or kithkit-catalog.toml's private_key",
        )?;
    decode_private_key(&encoded).context("decode authority private key")
}

/// Read and parse a [`SignedCatalogIndex`] from `path`.
pub fn read_index(path: &Path) -> Result<SignedCatalogIndex> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read index '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse index '{}'", path.display()))
}

/// Read and parse a [`SignedCatalogIndex`], returning `None` if `path` does
/// not exist instead of erroring.
pub fn read_index_optional(path: &Path) -> Result<Option<SignedCatalogIndex>> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map(Some).with_context(|| format!("parse index '{}'", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read index '{}'", path.display())),
    }
}

/// Pretty-print and write a [`SignedCatalogIndex`] to `path`.
pub fn write_index(path: &Path, index: &SignedCatalogIndex) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| format!("create '{}'", parent.display()))?;
        }
    }
    let content = serde_json::to_string_pretty(index)?;
    std::fs::write(path, content).with_context(|| format!("write index '{}'", path.display()))
}

/// Read and parse a [`SignedRevocationList`] from `path`, returning `None`
/// if the file does not exist.
pub fn read_revocations_optional(path: &Path) -> Result<Option<SignedRevocationList>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            serde_json::from_str(&content).map(Some).with_context(|| format!("parse revocations '{}'", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read revocations '{}'", path.display())),
    }
}

/// Schema types printable by the `schema` subcommand on either binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaKind {
    /// JSON schema for [`kithkit_core::Manifest`].
    Manifest,
    /// JSON schema for [`SignedCatalogIndex`].
    Index,
    /// JSON schema for [`SignedRevocationList`].
    Revocations,
    /// JSON schema for [`kithkit_core::InstallMetadata`].
    InstallMetadata,
}

/// Return the pretty-printed JSON schema for `kind`.
pub fn schema_json(kind: SchemaKind) -> Result<String> {
    let value = match kind {
        SchemaKind::Manifest => serde_json::to_value(schema_for!(kithkit_core::Manifest))?,
        SchemaKind::Index => serde_json::to_value(schema_for!(SignedCatalogIndex))?,
        SchemaKind::Revocations => serde_json::to_value(schema_for!(SignedRevocationList))?,
        SchemaKind::InstallMetadata => serde_json::to_value(schema_for!(kithkit_core::InstallMetadata))?,
    };
    serde_json::to_string_pretty(&value).context("serialize schema")
}
