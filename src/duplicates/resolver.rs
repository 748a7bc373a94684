//! Hash collision resolution.
//!
//! Every candidate group is checked with an all-pairs exact comparison.
//! A file that compares unequal against *any* sibling is removed from the
//! group entirely, together with that sibling, regardless of how many other
//! siblings it matched. Groups left with fewer than two members are dropped.
//!
//! Resolution consumes the candidate groups and builds a fresh list of
//! verified groups; nothing is mutated while it is being iterated.

use std::collections::HashSet;
use std::path::Path;

use super::compare::ContentComparator;
use super::groups::{DigestGroup, DuplicateGroup};
use crate::scanner::{hash_to_hex, FileEntry};

/// Statistics from collision resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Candidate groups examined
    pub groups_in: usize,
    /// Groups that survived as verified duplicates
    pub groups_out: usize,
    /// Distinct files removed because of a collision
    pub collided_files: usize,
    /// Groups discarded because fewer than two members survived
    pub dropped_groups: usize,
    /// Pairwise comparisons performed
    pub comparisons: usize,
}

/// Outcome of resolving a single group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResolution {
    /// The verified group, if at least two members survived
    pub verified: Option<DuplicateGroup>,
    /// Files removed from the group, in member order
    pub collided: Vec<FileEntry>,
    /// Pairwise comparisons performed
    pub comparisons: usize,
}

/// Verify one candidate group.
pub fn resolve_group<C>(group: DigestGroup, comparator: &C) -> GroupResolution
where
    C: ContentComparator + ?Sized,
{
    let files = &group.files;
    let n = files.len();
    let mut marked = vec![false; n];
    let mut comparisons = 0;

    for i in 0..n {
        for j in (i + 1)..n {
            // Both already excluded: this pair cannot change the outcome.
            if marked[i] && marked[j] {
                continue;
            }
            comparisons += 1;
            if comparator.differ(&files[i].path, &files[j].path) {
                log::debug!(
                    "Content mismatch under digest {}: {} / {}",
                    hash_to_hex(&group.hash),
                    files[i].path.display(),
                    files[j].path.display()
                );
                marked[i] = true;
                marked[j] = true;
            }
        }
    }

    let collided_paths: HashSet<&Path> = files
        .iter()
        .zip(&marked)
        .filter(|(_, m)| **m)
        .map(|(f, _)| f.path.as_path())
        .collect();

    if collided_paths.is_empty() {
        return GroupResolution {
            verified: (n > 1).then(|| DuplicateGroup::new(group.hash, group.files)),
            collided: Vec::new(),
            comparisons,
        };
    }

    let mut seen: HashSet<&Path> = HashSet::new();
    let mut collided = Vec::new();
    let mut survivors = Vec::new();
    for file in files {
        if collided_paths.contains(file.path.as_path()) {
            if seen.insert(file.path.as_path()) {
                collided.push(file.clone());
            }
        } else {
            survivors.push(file.clone());
        }
    }

    GroupResolution {
        verified: (survivors.len() > 1).then(|| DuplicateGroup::new(group.hash, survivors)),
        collided,
        comparisons,
    }
}

/// Verify all candidate groups, returning only true duplicate groups.
///
/// Each file removed because of a collision is reported as a warning.
/// Group order is preserved.
pub fn resolve_collisions<C>(
    groups: Vec<DigestGroup>,
    comparator: &C,
) -> (Vec<DuplicateGroup>, ResolveStats)
where
    C: ContentComparator + ?Sized,
{
    let mut stats = ResolveStats {
        groups_in: groups.len(),
        ..ResolveStats::default()
    };
    let mut verified = Vec::with_capacity(groups.len());

    for group in groups {
        let resolution = resolve_group(group, comparator);
        stats.comparisons += resolution.comparisons;
        stats.collided_files += resolution.collided.len();

        for file in &resolution.collided {
            log::warn!(
                "Skipping file because a hash collision was detected: {}",
                file.path.display()
            );
        }

        match resolution.verified {
            Some(group) => verified.push(group),
            None => stats.dropped_groups += 1,
        }
    }

    stats.groups_out = verified.len();
    log::debug!(
        "Resolution: {} groups in, {} verified, {} dropped, {} collided files, {} comparisons",
        stats.groups_in,
        stats.groups_out,
        stats.dropped_groups,
        stats.collided_files,
        stats.comparisons
    );

    (verified, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Comparator driven by a content label per path.
    struct Labelled {
        labels: HashMap<PathBuf, &'static str>,
        calls: Mutex<usize>,
    }

    impl Labelled {
        fn new(pairs: &[(&str, &'static str)]) -> Self {
            Self {
                labels: pairs
                    .iter()
                    .map(|(p, l)| (PathBuf::from(p), *l))
                    .collect(),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl ContentComparator for Labelled {
        fn differ(&self, a: &Path, b: &Path) -> bool {
            *self.calls.lock().unwrap() += 1;
            self.labels[a] != self.labels[b]
        }
    }

    fn group(paths: &[&str]) -> DigestGroup {
        DigestGroup::new(
            [7; 32],
            paths
                .iter()
                .map(|p| FileEntry::new(PathBuf::from(p), 10))
                .collect(),
        )
    }

    fn verified_paths(resolution: &GroupResolution) -> Vec<PathBuf> {
        resolution
            .verified
            .as_ref()
            .map(DuplicateGroup::paths)
            .unwrap_or_default()
    }

    #[test]
    fn test_all_identical_survive() {
        let cmp = Labelled::new(&[("a", "x"), ("b", "x"), ("c", "x")]);
        let res = resolve_group(group(&["a", "b", "c"]), &cmp);

        assert_eq!(
            verified_paths(&res),
            vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]
        );
        assert!(res.collided.is_empty());
        assert_eq!(cmp.calls(), 3);
    }

    #[test]
    fn test_two_unique_files_colliding() {
        let cmp = Labelled::new(&[("a", "x"), ("b", "y")]);
        let res = resolve_group(group(&["a", "b"]), &cmp);

        assert!(res.verified.is_none());
        assert_eq!(res.collided.len(), 2);
    }

    #[test]
    fn test_two_duplicate_pairs_sharing_digest_are_dropped() {
        let cmp = Labelled::new(&[("a", "x"), ("b", "x"), ("c", "y"), ("d", "y")]);
        let res = resolve_group(group(&["a", "b", "c", "d"]), &cmp);

        assert!(res.verified.is_none());
        assert_eq!(res.collided.len(), 4);
    }

    #[test]
    fn test_duplicate_pair_plus_distinct_file_is_dropped() {
        let cmp = Labelled::new(&[("a", "x"), ("b", "x"), ("c", "z")]);
        let res = resolve_group(group(&["a", "b", "c"]), &cmp);

        assert!(res.verified.is_none());
        let collided: Vec<_> = res.collided.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            collided,
            vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]
        );
    }

    #[test]
    fn test_single_outlier_collides_whole_group() {
        // a, b, c identical; d differs from all. Every pair (x, d) marks x too,
        // so nothing survives.
        let cmp = Labelled::new(&[("a", "x"), ("b", "x"), ("c", "x"), ("d", "w")]);
        let res = resolve_group(group(&["a", "b", "c", "d"]), &cmp);

        assert!(res.verified.is_none());
    }

    #[test]
    fn test_survivor_order_is_preserved() {
        // Only the last pair is compared unequal; a and b survive untouched.
        struct OnlyCD;
        impl ContentComparator for OnlyCD {
            fn differ(&self, a: &Path, b: &Path) -> bool {
                (a == Path::new("c") && b == Path::new("d"))
                    || (a == Path::new("d") && b == Path::new("c"))
            }
        }

        let res = resolve_group(group(&["a", "b", "c", "d"]), &OnlyCD);

        assert_eq!(
            verified_paths(&res),
            vec![PathBuf::from("a"), PathBuf::from("b")]
        );
        assert_eq!(res.collided.len(), 2);
    }

    #[test]
    fn test_repeated_path_reported_once() {
        let cmp = Labelled::new(&[("a", "x"), ("b", "y")]);
        let res = resolve_group(group(&["a", "b", "a"]), &cmp);

        assert!(res.verified.is_none());
        let collided: Vec<_> = res.collided.iter().map(|f| f.path.clone()).collect();
        assert_eq!(collided, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_resolve_collisions_mixed_cases() {
        let cmp = Labelled::new(&[
            ("u1", "p"),
            ("u2", "q"),
            ("d1", "x"),
            ("d2", "x"),
            ("e1", "y"),
            ("e2", "y"),
        ]);
        let mut case1 = group(&["u1", "u2"]);
        case1.hash = [1; 32];
        let mut case2 = group(&["d1", "d2", "e1", "e2"]);
        case2.hash = [2; 32];
        let mut case3 = group(&["d1", "d2", "u1"]);
        case3.hash = [3; 32];
        let mut case4 = group(&["d1", "d2"]);
        case4.hash = [4; 32];

        let (verified, stats) = resolve_collisions(vec![case1, case2, case3, case4], &cmp);

        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].hash, [4; 32]);
        assert_eq!(stats.groups_in, 4);
        assert_eq!(stats.groups_out, 1);
        assert_eq!(stats.dropped_groups, 3);
        assert_eq!(stats.collided_files, 2 + 4 + 3);
    }

    #[test]
    fn test_resolve_collisions_empty() {
        let cmp = Labelled::new(&[]);
        let (verified, stats) = resolve_collisions(Vec::new(), &cmp);

        assert!(verified.is_empty());
        assert_eq!(stats, ResolveStats::default());
    }
}
