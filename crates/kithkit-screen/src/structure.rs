// SPDX-License-Identifier: MIT OR Apache-2.0
//! Required files, extension denylist, and size caps.

use kithkit_archive::{MAX_FILE_BYTES, MAX_TOTAL_BYTES};
use kithkit_core::Finding;

/// Files every skill archive must contain, relative to the skill-name
/// prefix.
const REQUIRED_FILES: &[&str] = &["manifest.yaml", "SKILL.md"];

/// Extensions that must never appear inside a skill archive: scripts,
/// binaries, shared libraries, and bytecode.
const DENIED_EXTENSIONS: &[&str] =
    &["sh", "bash", "exe", "dll", "so", "dylib", "bat", "cmd", "ps1", "com", "class", "pyc", "jar"];

fn basename_sans_prefix(path: &str) -> &str {
    path.split_once('/').map_or(path, |(_, rest)| rest)
}

fn extension_of(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(_, ext)| ext)
}

/// `entries` is `(path, size)` as returned by
/// [`kithkit_archive::list_entries`] — paths still carry the skill-name
/// prefix.
#[must_use]
pub fn structure_check(entries: &[(String, u64)]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for required in REQUIRED_FILES {
        let present = entries.iter().any(|(path, _)| basename_sans_prefix(path) == *required);
        if !present {
            findings.push(Finding::error("structure/required-file", format!("missing required file '{required}'")));
        }
    }

    let mut total: u64 = 0;
    for (path, size) in entries {
        total += size;
        if *size > MAX_FILE_BYTES {
            findings.push(
                Finding::error("structure/size", format!("'{path}' is {size} bytes, exceeds the {MAX_FILE_BYTES}-byte per-file cap"))
                    .with_file(path.clone()),
            );
        }
        if let Some(ext) = extension_of(path) {
            if DENIED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                findings.push(
                    Finding::error("structure/denied-extension", format!("'{path}' has a disallowed extension '.{ext}'"))
                        .with_file(path.clone()),
                );
            }
        }
    }
    if total > MAX_TOTAL_BYTES {
        findings.push(Finding::error(
            "structure/size",
            format!("archive totals {total} bytes, exceeds the {MAX_TOTAL_BYTES}-byte total cap"),
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_small_archive_has_no_findings() {
        let entries = vec![("demo/manifest.yaml".to_string(), 200), ("demo/SKILL.md".to_string(), 400)];
        assert!(structure_check(&entries).is_empty());
    }

    #[test]
    fn missing_required_file_is_reported() {
        let entries = vec![("demo/manifest.yaml".to_string(), 200)];
        let findings = structure_check(&entries);
        assert!(findings.iter().any(|f| f.message.contains("SKILL.md")));
    }

    #[test]
    fn denied_extension_and_oversize_file_are_both_reported() {
        let entries = vec![
            ("demo/manifest.yaml".to_string(), 200),
            ("demo/SKILL.md".to_string(), 400),
            ("demo/install.sh".to_string(), 10),
            ("demo/huge.bin".to_string(), MAX_FILE_BYTES + 1),
        ];
        let findings = structure_check(&entries);
        assert!(findings.iter().any(|f| f.check == "structure/denied-extension"));
        assert!(findings.iter().any(|f| f.check == "structure/size" && f.file.as_deref() == Some("demo/huge.bin")));
    }

    #[test]
    fn total_size_cap_is_enforced_across_files() {
        let entries = vec![
            ("demo/manifest.yaml".to_string(), 200),
            ("demo/SKILL.md".to_string(), 400),
            ("demo/a.md".to_string(), MAX_TOTAL_BYTES),
        ];
        let findings = structure_check(&entries);
        assert!(findings.iter().any(|f| f.check == "structure/size" && f.file.is_none()));
    }
}
