//! Integration tests for the skeletonize CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn skeletonize(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("skeletonize").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("SKELETONIZE_CONFIG");
    cmd
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("skeletonize").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("localize settings from python config"))
        .stdout(predicate::str::contains("--remove_missing"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("skeletonize").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skeletonize"));
}

/// Missing source file is reported by name and nothing is written
#[test]
fn test_missing_source_file() {
    let temp_dir = TempDir::new().unwrap();

    skeletonize(&temp_dir)
        .arg("some_file.py")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to load 'source_file' some_file.py"));

    assert!(!temp_dir.path().join("local.settings.ini").exists());
}

/// Discovery of the fixture settings module, reported as JSON
#[test]
fn test_discovered_schema_json() {
    let temp_dir = TempDir::new().unwrap();

    let assert = skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .args(["--format", "json"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(
        report["discovered"],
        serde_json::json!({
            "database": ["engine", "host", "name", "password", "port", "user"],
            "debug": ["debug", "internal_ips"],
            "email": ["default_from", "host", "password", "port", "use_tls", "user"],
            "foo": ["float_name", "int_name"],
            "secrets": ["key"],
            "server": ["base_url"],
        })
    );
    assert_eq!(report["ini_file"], "local.settings.ini");
}

/// A fresh ini file gets every discovered key with an empty value
#[test]
fn test_creates_new_ini_file() {
    let temp_dir = TempDir::new().unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: local.settings.ini"));

    let written = fs::read_to_string(temp_dir.path().join("local.settings.ini")).unwrap();
    assert!(written.contains("[secrets]\nkey = \n"));
    assert!(written.contains("[server]\nbase_url = \n"));
    assert!(!written.contains("[retired]"));
}

/// An existing target is left byte-for-byte unchanged without --overwrite
#[test]
fn test_existing_ini_without_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let ini = temp_dir.path().join("local.settings.ini");
    fs::copy(fixture("local.settings.ini"), &ini).unwrap();
    let before = fs::read(&ini).unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("exists and overwrite is False"));

    assert_eq!(fs::read(&ini).unwrap(), before);
}

/// Overwriting keeps existing values and stale sections
#[test]
fn test_overwrite_keeps_existing_values() {
    let temp_dir = TempDir::new().unwrap();
    let ini = temp_dir.path().join("local.settings.ini");
    fs::copy(fixture("local.settings.ini"), &ini).unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .arg("-o")
        .assert()
        .success()
        .stdout(predicate::str::contains("old_section"));

    let written = fs::read_to_string(&ini).unwrap();
    assert!(written.starts_with("[server]\nbase_url = http://127.0.0.1:8000\n"));
    assert!(written.contains("port = 666\n"));
    assert!(written.contains("[old_section]\nfoo = bar\noh = mt\n"));
    assert!(written.contains("[email]\n"));
}

/// Overwriting with --remove_missing prunes what the module no longer reads
#[test]
fn test_overwrite_remove_missing() {
    let temp_dir = TempDir::new().unwrap();
    let ini = temp_dir.path().join("dev.ini");
    fs::copy(fixture("local.settings.ini"), &ini).unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .args(["--ini_file", "dev.ini", "-o", "-r"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: dev.ini"));

    let written = fs::read_to_string(&ini).unwrap();
    assert!(!written.contains("old_section"));
    assert!(written.contains("debug = true\n"));
    assert!(written.contains("[foo]\nfloat_name = \nint_name = \n"));
}

/// Running twice with --overwrite produces the same file
#[test]
fn test_second_run_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    let ini = temp_dir.path().join("local.settings.ini");
    fs::copy(fixture("local.settings.ini"), &ini).unwrap();

    for _ in 0..2 {
        skeletonize(&temp_dir)
            .arg(fixture("settings.py"))
            .arg("--overwrite")
            .assert()
            .success();
    }
    let first = fs::read_to_string(&ini).unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .arg("--overwrite")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to add or remove"));

    assert_eq!(fs::read_to_string(&ini).unwrap(), first);
}

/// --dry-run prints the result and writes nothing
#[test]
fn test_dry_run() {
    let temp_dir = TempDir::new().unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[database]\nengine = \n"));

    assert!(!temp_dir.path().join("local.settings.ini").exists());
}

/// The default target can come from a settings file
#[test]
fn test_custom_settings_default_ini_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("skeletonize.toml"),
        "[store]\ndefault_ini_file = \"from_settings.ini\"\n",
    )
    .unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .arg("-q")
        .assert()
        .success();

    assert!(temp_dir.path().join("from_settings.ini").exists());
}

/// The settings file can also be named through the environment
#[test]
fn test_settings_file_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    let settings = temp_dir.path().join("custom.toml");
    fs::write(&settings, "[store]\ndefault_ini_file = \"from_env.ini\"\n").unwrap();

    skeletonize(&temp_dir)
        .env("SKELETONIZE_CONFIG", &settings)
        .arg(fixture("settings.py"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: from_env.ini"));

    assert!(temp_dir.path().join("from_env.ini").exists());
}

/// Multi-line values in an existing file survive a pruning rewrite
#[test]
fn test_multi_line_value_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let ini = temp_dir.path().join("local.settings.ini");
    fs::write(&ini, "[debug]\ninternal_ips =\n    127.0.0.1\n\n    10.0.0.1\ndebug = true\n").unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .args(["-o", "-r"])
        .assert()
        .success();

    let written = fs::read_to_string(&ini).unwrap();
    assert!(written.contains("[debug]\ninternal_ips =\n\t127.0.0.1\n\t\n\t10.0.0.1\ndebug = true\n"));
}

/// A malformed existing ini file is reported, not overwritten
#[test]
fn test_malformed_existing_ini() {
    let temp_dir = TempDir::new().unwrap();
    let ini = temp_dir.path().join("local.settings.ini");
    fs::write(&ini, "orphan = value\n").unwrap();

    skeletonize(&temp_dir)
        .arg(fixture("settings.py"))
        .arg("-o")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed ini"));

    assert_eq!(fs::read_to_string(&ini).unwrap(), "orphan = value\n");
}
