// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integration tests for the `kithkit` consumer binary, driving a local
//! catalog root end to end: build + sign an index, then search/install/
//! list/update/uninstall against it.

use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;

fn kithkit() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("kithkit").expect("binary `kithkit` should be built")
}

fn kithkit_catalog() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("kithkit-catalog").expect("binary `kithkit-catalog` should be built")
}

fn write_skill_source(dir: &Path, name: &str, version: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("manifest.yaml"),
        format!(
            "name: {name}\nversion: {version}\ndescription: Looks up the current weather\nauthor:\n  name: Test Author\n  github: testauthor\ncapabilities:\n  required: [\"network\"]\ntags: [\"weather\", \"demo\"]\n"
        ),
    )
    .unwrap();
    fs::write(dir.join("SKILL.md"), "# Weather Check\n\nLooks up the current weather for a city.\n").unwrap();
}

fn build_archive_in_catalog(catalog_root: &Path, name: &str, version: &str) {
    let src = catalog_root.join(format!("src-{name}"));
    write_skill_source(&src, name, version);
    let archive = kithkit_archive::build_archive(&src, name).unwrap();

    let dest_dir = catalog_root.join("archives").join(name);
    fs::create_dir_all(&dest_dir).unwrap();
    fs::write(dest_dir.join(format!("{name}-{version}.tar.gz")), archive).unwrap();
}

/// Build a one-skill catalog root (`archives/`, signed `index.json`) and
/// return its path plus the base64 SPKI public key that verifies it.
fn setup_catalog(name: &str, version: &str) -> (tempfile::TempDir, String) {
    let (private, public) = {
        let output = kithkit_catalog().arg("keygen").output().expect("run keygen");
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut private = None;
        let mut public = None;
        for line in stdout.lines() {
            if let Some(rest) = line.strip_prefix("private: ") {
                private = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("public:  ") {
                public = Some(rest.trim().to_string());
            }
        }
        (private.unwrap(), public.unwrap())
    };

    let catalog_root = tempfile::tempdir().unwrap();
    build_archive_in_catalog(catalog_root.path(), name, version);

    kithkit_catalog()
        .current_dir(catalog_root.path())
        .args(["build", "archives", "index.json", "--private-key", &private])
        .assert()
        .success();

    (catalog_root, public)
}

fn write_consumer_config(catalog_root: &Path, skills_dir: &Path, public_key: &str) -> std::path::PathBuf {
    let config_path = catalog_root.join("kithkit.toml");
    fs::write(
        &config_path,
        format!(
            "catalog_root = \".\"\nskills_dir = \"{}\"\npublic_key = \"{public_key}\"\n",
            skills_dir.display()
        ),
    )
    .unwrap();
    config_path
}

#[test]
fn help_flag_prints_usage() {
    kithkit()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("kithkit"))
        .stdout(contains("install"))
        .stdout(contains("search"));
}

#[test]
fn search_finds_the_built_skill() {
    let (catalog_root, public) = setup_catalog("weather-check", "1.0.0");
    let skills_dir = tempfile::tempdir().unwrap();
    let config_path = write_consumer_config(catalog_root.path(), skills_dir.path(), &public);

    kithkit()
        .current_dir(catalog_root.path())
        .args(["--config", config_path.to_str().unwrap(), "search", "weather"])
        .assert()
        .success()
        .stdout(contains("weather-check"));
}

#[test]
fn install_then_list_then_uninstall_round_trips() {
    let (catalog_root, public) = setup_catalog("weather-check", "1.0.0");
    let skills_dir = tempfile::tempdir().unwrap();
    let config_path = write_consumer_config(catalog_root.path(), skills_dir.path(), &public);

    kithkit()
        .current_dir(catalog_root.path())
        .args(["--config", config_path.to_str().unwrap(), "install", "weather-check"])
        .assert()
        .success()
        .stdout(contains("installed weather-check@1.0.0"));

    assert!(skills_dir.path().join("weather-check").join("SKILL.md").exists());
    assert!(skills_dir.path().join("weather-check").join(kithkit_core::METADATA_FILENAME).exists());

    kithkit()
        .current_dir(catalog_root.path())
        .args(["--config", config_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(contains("weather-check"));

    kithkit()
        .current_dir(catalog_root.path())
        .args(["--config", config_path.to_str().unwrap(), "uninstall", "weather-check"])
        .assert()
        .success();

    assert!(!skills_dir.path().join("weather-check").exists());
}

#[test]
fn installing_twice_without_a_new_version_fails() {
    let (catalog_root, public) = setup_catalog("weather-check", "1.0.0");
    let skills_dir = tempfile::tempdir().unwrap();
    let config_path = write_consumer_config(catalog_root.path(), skills_dir.path(), &public);

    kithkit()
        .current_dir(catalog_root.path())
        .args(["--config", config_path.to_str().unwrap(), "install", "weather-check"])
        .assert()
        .success();

    kithkit()
        .current_dir(catalog_root.path())
        .args(["--config", config_path.to_str().unwrap(), "install", "weather-check"])
        .assert()
        .failure()
        .stderr(contains("already installed"));
}

#[test]
fn update_reports_already_up_to_date_when_the_index_is_unchanged() {
    let (catalog_root, public) = setup_catalog("weather-check", "1.0.0");
    let skills_dir = tempfile::tempdir().unwrap();
    let config_path = write_consumer_config(catalog_root.path(), skills_dir.path(), &public);

    kithkit()
        .current_dir(catalog_root.path())
        .args(["--config", config_path.to_str().unwrap(), "install", "weather-check"])
        .assert()
        .success();

    kithkit()
        .current_dir(catalog_root.path())
        .args(["--config", config_path.to_str().unwrap(), "update", "weather-check"])
        .assert()
        .success()
        .stdout(contains("already up to date"));
}

#[test]
fn selftest_reports_tier_results() {
    kithkit()
        .arg("selftest")
        .assert()
        .success()
        .stdout(contains("tier"));
}
