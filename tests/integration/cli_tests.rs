use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn dupverify(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dupverify"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("DUPVERIFY_IO_THREADS", "2")
        .output()
        .unwrap()
}

fn target(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_reports_duplicates_and_exits_zero() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"photo").unwrap();
    fs::write(dir.path().join("b.jpg"), b"photo").unwrap();

    let output = dupverify(&["--target", target(dir.path()), "--searchpattern", "*.jpg"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Found 1 distinct file with duplicates."));
    assert!(stdout.contains("Duplicates detected (SHA256 "));
    assert!(stdout.contains(&format!("File: {}", dir.path().join("b.jpg").display())));
    assert!(dir.path().join("b.jpg").exists());
}

#[test]
fn test_zero_duplicates_is_success() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"one").unwrap();
    fs::write(dir.path().join("b.jpg"), b"two").unwrap();

    let output = dupverify(&[
        "-target",
        target(dir.path()),
        "-searchpattern",
        "*.jpg",
        "-delete",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Found 0 distinct files with duplicates."));
    assert!(!stdout.contains("Deleted:"));
    assert!(dir.path().join("a.jpg").exists());
    assert!(dir.path().join("b.jpg").exists());
}

#[test]
fn test_legacy_delete_flag_removes_copies() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();

    let output = dupverify(&[
        "-Target",
        target(dir.path()),
        "-SearchPattern",
        "*",
        "-DELETE",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("Deleted: {}", dir.path().join("b.txt").display())));
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn test_json_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();

    let output = dupverify(&[
        "--target",
        target(dir.path()),
        "--searchpattern",
        "*",
        "--output",
        "json",
        "-q",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["group_count"], 1);
    assert_eq!(value["algorithm"], "sha256");
    assert_eq!(value["groups"][0]["files"].as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_arguments_exit_one_with_usage() {
    let output = dupverify(&[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("USAGE (to search and preserve duplicates)"));
    assert!(stderr.contains("USAGE (to delete duplicates)"));
}

#[test]
fn test_missing_target_directory_exits_one() {
    let output = dupverify(&[
        "--target",
        "/nonexistent/dupverify/dir",
        "--searchpattern",
        "*",
    ]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_zero() {
    let output = dupverify(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--searchpattern"));
}

#[test]
fn test_invalid_pattern_exits_one() {
    let dir = tempdir().unwrap();
    let output = dupverify(&["--target", target(dir.path()), "--searchpattern", "sub/*.jpg"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_bracket_pattern_matches_literal_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("shot[1].png"), b"pixels").unwrap();
    fs::write(dir.path().join("shot[1] copy.png"), b"pixels").unwrap();
    fs::write(dir.path().join("shot1.png"), b"pixels").unwrap();

    let output = dupverify(&["--target", target(dir.path()), "--searchpattern", "shot[1]*"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Found 1 distinct file with duplicates."));
    assert!(!stdout.contains("shot1.png"));
}
