// SPDX-License-Identifier: MIT OR Apache-2.0
use kithkit_archive::{build_archive, extract_archive, extract_manifest, extract_parsed_manifest, list_entries, ExtractError};
use std::fs;

fn write_skill(dir: &std::path::Path) {
    fs::write(
        dir.join("manifest.yaml"),
        b"name: weather-check\nversion: 1.0.0\ndescription: Looks up weather\nauthor:\n  name: A\n  github: a\n",
    )
    .unwrap();
    fs::write(dir.join("SKILL.md"), b"# Weather Check\n\nLooks up the current weather for a city.\n").unwrap();
    fs::write(dir.join("reference.md"), b"See the weather API docs.\n").unwrap();
}

#[test]
fn build_then_extract_round_trips_every_file() {
    let src = tempfile::tempdir().unwrap();
    write_skill(src.path());

    let archive = build_archive(src.path(), "weather-check").unwrap();

    let manifest = extract_parsed_manifest(&archive).unwrap();
    assert_eq!(manifest.name, "weather-check");
    assert_eq!(manifest.version, "1.0.0");

    let out = tempfile::tempdir().unwrap();
    extract_archive(&archive, out.path()).unwrap();
    for name in ["manifest.yaml", "SKILL.md", "reference.md"] {
        assert_eq!(fs::read(src.path().join(name)).unwrap(), fs::read(out.path().join(name)).unwrap());
    }
}

#[test]
fn archive_layout_is_deterministic_across_separate_builds() {
    let src1 = tempfile::tempdir().unwrap();
    let src2 = tempfile::tempdir().unwrap();
    write_skill(src1.path());
    write_skill(src2.path());

    let a1 = build_archive(src1.path(), "weather-check").unwrap();
    let a2 = build_archive(src2.path(), "weather-check").unwrap();
    assert_eq!(a1, a2, "identical source trees must produce byte-identical archives");
}

#[test]
fn entry_listing_matches_built_files() {
    let src = tempfile::tempdir().unwrap();
    write_skill(src.path());
    let archive = build_archive(src.path(), "weather-check").unwrap();

    let mut names: Vec<String> = list_entries(&archive).unwrap().into_iter().map(|(path, _)| path).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "weather-check/SKILL.md".to_string(),
            "weather-check/manifest.yaml".to_string(),
            "weather-check/reference.md".to_string(),
        ]
    );
}

#[test]
fn missing_manifest_yaml_is_a_not_found_error() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("SKILL.md"), b"# hi").unwrap();
    let archive = build_archive(src.path(), "bare").unwrap();
    let err = extract_manifest(&archive).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

fn raw_archive_with_entry(name: &str, content: &[u8]) -> Vec<u8> {
    let gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(gz);
    let mut header = tar::Header::new_ustar();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, name, content).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

#[test]
fn extraction_rejects_parent_directory_traversal() {
    let archive = raw_archive_with_entry("weather-check/../../etc/passwd", b"pwned");
    let out = tempfile::tempdir().unwrap();
    let err = extract_archive(&archive, out.path()).unwrap_err();
    assert!(matches!(err, ExtractError::PathTraversal(_)));
    assert!(!out.path().parent().unwrap().join("etc").exists());
}

#[test]
fn extraction_rejects_absolute_path_entries() {
    let archive = raw_archive_with_entry("/etc/passwd", b"pwned");
    let out = tempfile::tempdir().unwrap();
    let err = extract_archive(&archive, out.path()).unwrap_err();
    assert!(matches!(err, ExtractError::PathTraversal(_)));
}

#[test]
fn extraction_of_garbage_bytes_fails_cleanly() {
    let out = tempfile::tempdir().unwrap();
    let err = extract_archive(b"not a gzip stream at all", out.path()).unwrap_err();
    assert!(matches!(err, ExtractError::Io(_) | ExtractError::BadHeader(_)));
}
