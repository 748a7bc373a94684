use dupverify::actions::{delete_duplicates, DeleteMethod};
use dupverify::duplicates::DuplicateFinder;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_delete_keeps_first_seen_copy() {
    let dir = tempdir().unwrap();
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        fs::write(dir.path().join(name), b"photo").unwrap();
    }
    fs::write(dir.path().join("d.jpg"), b"other").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    let report = delete_duplicates(&groups, &DeleteMethod::Permanent);

    assert!(dir.path().join("a.jpg").exists());
    assert!(!dir.path().join("b.jpg").exists());
    assert!(!dir.path().join("c.jpg").exists());
    assert!(dir.path().join("d.jpg").exists());

    let removed: Vec<_> = report.groups[0].deleted.iter().map(|d| d.path.clone()).collect();
    assert_eq!(
        removed,
        vec![dir.path().join("c.jpg"), dir.path().join("b.jpg")]
    );
    assert_eq!(report.bytes_freed, 10);
}

#[test]
fn test_rescan_after_delete_finds_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one"), b"dup").unwrap();
    fs::write(dir.path().join("two"), b"dup").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    delete_duplicates(&groups, &DeleteMethod::Permanent);

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_delete_continues_after_missing_file() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), b"same").unwrap();
    }

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    fs::remove_file(dir.path().join("c")).unwrap();

    let report = delete_duplicates(&groups, &DeleteMethod::Permanent);

    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.success_count(), 1);
    assert!(dir.path().join("a").exists());
    assert!(!dir.path().join("b").exists());
}

#[test]
fn test_delete_with_no_groups() {
    let report = delete_duplicates(&[], &DeleteMethod::Permanent);
    assert_eq!(report.success_count(), 0);
    assert!(report.all_succeeded());
}
