//! Digest grouping and duplicate group types.
//!
//! # Overview
//!
//! [`DigestIndex`] accumulates `(file, digest)` pairs into buckets keyed by
//! digest. Buckets keep their members in append order and are themselves
//! ordered by the first time their digest was seen, so reports derived from
//! the index are deterministic for a given traversal order.
//!
//! After all files are inserted, [`DigestIndex::prune_unique`] drops every
//! bucket holding a single file: a unique digest cannot be a duplicate.
//!
//! # Example
//!
//! ```
//! use dupverify::duplicates::group_by_digest;
//! use dupverify::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let hashed = vec![
//!     (FileEntry::new(PathBuf::from("/a.txt"), 3), [1u8; 32]),
//!     (FileEntry::new(PathBuf::from("/b.txt"), 3), [1u8; 32]),
//!     (FileEntry::new(PathBuf::from("/c.txt"), 5), [2u8; 32]),
//! ];
//!
//! let (groups, stats) = group_by_digest(hashed);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(stats.unique_digests, 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{hash_to_hex, FileEntry, Hash};

/// Files sharing one digest, before byte-level verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestGroup {
    /// Digest shared by every member
    pub hash: Hash,
    /// Members in first-seen order
    pub files: Vec<FileEntry>,
}

impl DigestGroup {
    /// Create a group with initial members.
    #[must_use]
    pub fn new(hash: Hash, files: Vec<FileEntry>) -> Self {
        Self { hash, files }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Digest → ordered file list.
#[derive(Debug, Default)]
pub struct DigestIndex {
    slots: HashMap<Hash, usize>,
    groups: Vec<DigestGroup>,
}

impl DigestIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `file` to the bucket for `hash`, creating the bucket on
    /// first occurrence.
    pub fn insert(&mut self, file: FileEntry, hash: Hash) {
        match self.slots.get(&hash) {
            Some(&slot) => self.groups[slot].files.push(file),
            None => {
                self.slots.insert(hash, self.groups.len());
                self.groups.push(DigestGroup::new(hash, vec![file]));
            }
        }
    }

    /// Remove every bucket with exactly one member.
    ///
    /// Returns the number of buckets removed.
    pub fn prune_unique(&mut self) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| {
            if g.files.len() == 1 {
                log::trace!(
                    "Unique digest {}: {}",
                    hash_to_hex(&g.hash),
                    g.files[0].path.display()
                );
                false
            } else {
                true
            }
        });
        self.slots = self
            .groups
            .iter()
            .enumerate()
            .map(|(slot, g)| (g.hash, slot))
            .collect();
        before - self.groups.len()
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if the index has no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume the index, yielding buckets in first-seen digest order.
    #[must_use]
    pub fn into_groups(self) -> Vec<DigestGroup> {
        self.groups
    }
}

/// Confirmed duplicate group: every member is byte-for-byte identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Content digest shared by every member
    #[serde(serialize_with = "serialize_hash")]
    pub hash: Hash,
    /// File size in bytes
    pub size: u64,
    /// Members in first-seen order; the first one is the copy that is kept
    #[serde(serialize_with = "serialize_paths")]
    pub files: Vec<FileEntry>,
}

fn serialize_hash<S: serde::Serializer>(hash: &Hash, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hash_to_hex(hash))
}

fn serialize_paths<S: serde::Serializer>(files: &[FileEntry], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(files.iter().map(|f| f.path.to_string_lossy()))
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// The size is taken from the first member.
    #[must_use]
    pub fn new(hash: Hash, files: Vec<FileEntry>) -> Self {
        let size = files.first().map_or(0, |f| f.size);
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of redundant copies (total - 1 kept).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Space held by the redundant copies.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// The member that survives deletion.
    #[must_use]
    pub fn keeper(&self) -> Option<&Path> {
        self.files.first().map(|f| f.path.as_path())
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from digest grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Number of digested files fed into the index
    pub total_files: usize,
    /// Number of digests seen exactly once (pruned)
    pub unique_digests: usize,
    /// Number of buckets with 2+ files
    pub candidate_groups: usize,
    /// Number of files in buckets with 2+ files
    pub candidate_files: usize,
}

/// Build the digest index from hashed files and prune unique digests.
///
/// `hashed` must be in traversal order; member order within each bucket
/// follows it.
#[must_use]
pub fn group_by_digest<I>(hashed: I) -> (Vec<DigestGroup>, GroupingStats)
where
    I: IntoIterator<Item = (FileEntry, Hash)>,
{
    let mut index = DigestIndex::new();
    let mut stats = GroupingStats::default();

    for (file, hash) in hashed {
        stats.total_files += 1;
        index.insert(file, hash);
    }

    stats.unique_digests = index.prune_unique();
    let groups = index.into_groups();
    stats.candidate_groups = groups.len();
    stats.candidate_files = groups.iter().map(DigestGroup::len).sum();

    log::debug!(
        "Grouping: {} files → {} candidate groups ({} unique digests pruned)",
        stats.total_files,
        stats.candidate_groups,
        stats.unique_digests
    );

    (groups, stats)
}
