// SPDX-License-Identifier: MIT OR Apache-2.0
//! Path-traversal-safe tar+gzip extraction.
//!
//! Deliberately does not call [`tar::Archive::unpack`]: this walks entries
//! by hand so a future tar crate upgrade that relaxes its own sanitization
//! can't silently widen what this accepts.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

/// Errors specific to archive extraction. Every variant maps onto
/// `KithkitError::Extract` at the call site (there is no direct
/// `kithkit-core` dependency here to avoid a cycle — `kithkit-install`
/// performs that conversion).
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// An entry attempted to escape the target directory.
    #[error("path traversal: entry '{0}' would escape the target directory")]
    PathTraversal(String),
    /// A tar header could not be parsed.
    #[error("bad tar header: {0}")]
    BadHeader(String),
    /// The archive ended before an entry's declared data was fully read.
    #[error("truncated archive")]
    Truncated,
    /// Underlying filesystem error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Safely extract `archive` (gzipped USTAR tar) into `target_dir`.
///
/// Follows this per-entry algorithm:
///
/// 1. Reject entries with an absolute path.
/// 2. Reject entries with any `..` path component.
/// 3. Strip the leading skill-name directory component; skip entries whose
///    remainder is then empty (the top-level directory entry itself).
/// 4. Resolve the remaining path against `target_dir` and require the
///    result to stay within it.
/// 5. Create missing parent directories and write exactly `size` bytes.
/// 6. Only regular-file entries produce files; other types are skipped.
///
/// Any failure aborts extraction immediately. Callers are responsible for
/// removing a partially populated `target_dir` — this function does not
/// clean up after itself, matching the rollback contract owned by
/// `kithkit-install`.
///
/// # Errors
///
/// Returns [`ExtractError::PathTraversal`] on the first unsafe entry,
/// [`ExtractError::BadHeader`]/[`ExtractError::Truncated`] on malformed
/// input, or [`ExtractError::Io`] for filesystem failures.
pub fn extract_archive(archive: &[u8], target_dir: &Path) -> Result<(), ExtractError> {
    fs::create_dir_all(target_dir)?;
    let target_base = target_dir.canonicalize()?;

    let gz = flate2::read::GzDecoder::new(archive);
    let mut ar = tar::Archive::new(gz);
    let entries = ar.entries().map_err(|e| ExtractError::BadHeader(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                ExtractError::Truncated
            } else {
                ExtractError::BadHeader(e.to_string())
            }
        })?;

        let raw_path = entry.path().map_err(|e| ExtractError::BadHeader(e.to_string()))?.into_owned();
        let display = raw_path.display().to_string();

        if raw_path.is_absolute() {
            return Err(ExtractError::PathTraversal(display));
        }
        if raw_path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(ExtractError::PathTraversal(display));
        }

        let remainder: PathBuf = raw_path.components().skip(1).collect();
        if remainder.as_os_str().is_empty() {
            continue;
        }

        let resolved = resolve_within(&target_base, &remainder)
            .ok_or_else(|| ExtractError::PathTraversal(display.clone()))?;

        if entry.header().entry_type() != tar::EntryType::Regular {
            continue;
        }

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(&resolved)?;
        let copied = io::copy(&mut entry, &mut file)?;
        if copied != entry.size() {
            return Err(ExtractError::Truncated);
        }
    }

    Ok(())
}

/// Lexically join `relative` (already known to contain no `..` or absolute
/// components) onto `base` and confirm the result is still a descendant of
/// `base`. `relative` having no `..` components already guarantees this;
/// this function exists as an explicit, independently-checkable second
/// gate rather than relying on that invariant alone.
fn resolve_within(base: &Path, relative: &Path) -> Option<PathBuf> {
    let mut resolved = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    resolved.starts_with(base).then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn archive_with_entry(name: &str, content: &[u8]) -> Vec<u8> {
        let gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        let mut builder = tar::Builder::new(gz);
        let mut header = tar::Header::new_ustar();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content).unwrap();
        let gz = builder.into_inner().unwrap();
        gz.finish().unwrap()
    }

    #[test]
    fn extracts_well_formed_archive() {
        let archive = archive_with_entry("demo/SKILL.md", b"# hi");
        let out = tempfile::tempdir().unwrap();
        extract_archive(&archive, out.path()).unwrap();
        assert_eq!(std::fs::read(out.path().join("SKILL.md")).unwrap(), b"# hi");
    }

    #[test]
    fn rejects_parent_dir_traversal() {
        let archive = archive_with_entry("demo/../../etc/passwd", b"pwned");
        let out = tempfile::tempdir().unwrap();
        let err = extract_archive(&archive, out.path()).unwrap_err();
        assert!(matches!(err, ExtractError::PathTraversal(_)));
        assert!(!out.path().parent().unwrap().join("etc").exists());
    }

    #[test]
    fn rejects_absolute_path_entry() {
        let archive = archive_with_entry("/etc/passwd", b"pwned");
        let out = tempfile::tempdir().unwrap();
        let err = extract_archive(&archive, out.path()).unwrap_err();
        assert!(matches!(err, ExtractError::PathTraversal(_)));
    }

    #[test]
    fn skips_bare_directory_entry() {
        let mut content = Vec::new();
        {
            let gz = flate2::write::GzEncoder::new(&mut content, flate2::Compression::default());
            let mut builder = tar::Builder::new(gz);
            let mut header = tar::Header::new_ustar();
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, "demo/", &[][..]).unwrap();
            builder.finish().unwrap();
        }
        let out = tempfile::tempdir().unwrap();
        extract_archive(&content, out.path()).unwrap();
        assert!(fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[test]
    fn writer_flush_noop() {
        // sanity: Write trait imported above is used by GzEncoder internals
        let mut v: Vec<u8> = Vec::new();
        v.write_all(b"x").unwrap();
        assert_eq!(v, b"x");
    }
}
