// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pack a source directory into a gzipped USTAR tar archive.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Size caps from spec §3 (per-file and total), exposed for test override.
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;
/// Total archive size cap (source tree, before compression).
pub const MAX_TOTAL_BYTES: u64 = 5 * 1024 * 1024;

/// Build a gzipped tar archive from every regular file directly inside
/// `source_dir` (non-recursive — a skill's source tree is flat:
/// `manifest.yaml`, `SKILL.md`, and a handful of reference files).
///
/// Entries are named `{skill_name}/{basename}` and written in basename
/// order, so that byte-identical source trees produce byte-identical
/// archives (modulo the gzip header's embedded mtime, which this function
/// zeroes).
///
/// # Errors
///
/// Returns [`io::Error`] if `source_dir` cannot be read or a file inside it
/// cannot be opened.
pub fn build_archive(source_dir: &Path, skill_name: &str) -> io::Result<Vec<u8>> {
    let mut entries: Vec<(String, std::path::PathBuf)> = fs::read_dir(source_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let gz = GzEncoder::new(Vec::new(), Compression::best());
    let mut builder = tar::Builder::new(gz);
    // Deterministic headers: don't leak local uid/gid/mtime into the
    // signed archive.
    builder.mode(tar::HeaderMode::Deterministic);

    for (basename, path) in entries {
        let name = format!("{skill_name}/{basename}");
        let mut file = fs::File::open(&path)?;
        builder.append_file(&name, &mut file)?;
    }

    let gz = builder.into_inner()?;
    gz.finish()
}
