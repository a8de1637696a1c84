// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory archive inspection: pull `manifest.yaml` out of an archive
//! without extracting anything to disk.

use kithkit_core::Manifest;
use std::io::{self, Read};

/// Decompress `archive` and return the raw bytes of the entry whose
/// basename is `name`, or `None` if no such entry exists — used by both
/// [`extract_manifest`] and `kithkit-screen`'s per-file checks, which run
/// against `SKILL.md`/`reference.md`/`CHANGELOG.md` without ever
/// extracting to disk.
///
/// # Errors
///
/// Returns [`io::Error`] if `archive` is not valid gzip/tar.
pub fn read_entry(archive: &[u8], name: &str) -> io::Result<Option<Vec<u8>>> {
    let gz = flate2::read::GzDecoder::new(archive);
    let mut ar = tar::Archive::new(gz);

    for entry in ar.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        if path.file_name().and_then(|n| n.to_str()) == Some(name) {
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            return Ok(Some(buf));
        }
    }
    Ok(None)
}

/// Decompress `archive` and return the raw bytes of `manifest.yaml` from
/// its single top-level directory.
///
/// # Errors
///
/// Returns [`io::Error`] if the archive is not valid gzip/tar, or of kind
/// [`io::ErrorKind::NotFound`] if no `manifest.yaml` entry exists.
pub fn extract_manifest(archive: &[u8]) -> io::Result<Vec<u8>> {
    read_entry(archive, "manifest.yaml")?
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "manifest.yaml not found in archive"))
}

/// Convenience wrapper: extract and parse `manifest.yaml` into a
/// [`Manifest`].
///
/// # Errors
///
/// Returns [`io::Error`] under the same conditions as [`extract_manifest`],
/// wrapping a YAML parse failure as [`io::ErrorKind::InvalidData`].
pub fn extract_parsed_manifest(archive: &[u8]) -> io::Result<Manifest> {
    let bytes = extract_manifest(archive)?;
    serde_yaml::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// List every entry's path (including the skill-name prefix) without
/// reading file contents — used by the structure/size checks in
/// `kithkit-screen`.
///
/// # Errors
///
/// Returns [`io::Error`] if the archive is not valid gzip/tar.
pub fn list_entries(archive: &[u8]) -> io::Result<Vec<(String, u64)>> {
    let gz = flate2::read::GzDecoder::new(archive);
    let mut ar = tar::Archive::new(gz);
    let mut out = Vec::new();
    for entry in ar.entries()? {
        let entry = entry?;
        if entry.header().entry_type() != tar::EntryType::Regular {
            continue;
        }
        let path = entry.path()?.into_owned().to_string_lossy().into_owned();
        out.push((path, entry.size()));
    }
    Ok(out)
}
