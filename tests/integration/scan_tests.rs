use dupverify::duplicates::{DuplicateFinder, FinderConfig};
use dupverify::scanner::{DigestAlgorithm, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.unique_digests, 3);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_one_byte_difference() {
    let dir = tempdir().unwrap();
    let content = vec![0xa5u8; 4096];
    let mut altered = content.clone();
    altered[4095] ^= 1;
    write(&dir.path().join("file1.bin"), &content);
    write(&dir.path().join("file2.bin"), &content);
    write(&dir.path().join("file3.bin"), &altered);

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths(),
        vec![dir.path().join("file1.bin"), dir.path().join("file2.bin")]
    );
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.collided_files, 0);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    write(&dir.path().join("a.txt"), b"nested duplicate");
    write(&sub.join("b.txt"), b"nested duplicate");

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].keeper(), Some(dir.path().join("a.txt").as_path()));
}

#[test]
fn test_scan_pattern_filters_names() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.jpg"), b"pic");
    write(&dir.path().join("b.jpg"), b"pic");
    write(&dir.path().join("c.txt"), b"pic");

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new("*.jpg"));
    let (groups, summary) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_scan_reports_sha256_of_content() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"abc");
    write(&dir.path().join("b"), b"abc");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(
        groups[0].hash_hex(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_scan_algorithms_agree_on_groups() {
    let dir = tempdir().unwrap();
    for (name, content) in [("a", "x"), ("b", "y"), ("c", "x"), ("d", "y"), ("e", "z")] {
        write(&dir.path().join(name), content.as_bytes());
    }

    let run = |algorithm| {
        let config = FinderConfig::default().with_algorithm(algorithm);
        let (groups, _) = DuplicateFinder::new(config)
            .find_duplicates(dir.path())
            .unwrap();
        groups.iter().map(|g| g.paths()).collect::<Vec<_>>()
    };

    assert_eq!(run(DigestAlgorithm::Sha256), run(DigestAlgorithm::Blake3));
}

#[test]
fn test_scan_is_idempotent_without_delete() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"same");
    write(&dir.path().join("b"), b"same");
    write(&dir.path().join("c"), b"other");

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_scan_summary_reclaimable_space() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        write(&dir.path().join(name), &[7u8; 1000]);
    }

    let (_, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.duplicate_files, 2);
    assert_eq!(summary.reclaimable_space, 2000);
    assert!(summary.hashed_files == 3 && summary.failed_files == 0);
}
