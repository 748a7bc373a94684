//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Digest grouping with unique-digest pruning ([`groups`])
//! - Exact byte comparison of candidate pairs ([`compare`])
//! - Collision resolution over candidate groups ([`resolver`])
//! - Pipeline orchestration ([`finder`])

pub mod compare;
pub mod finder;
pub mod groups;
pub mod resolver;

pub use compare::{
    compare_streams, ByteComparator, CompareErrorPolicy, ContentComparator, CHUNK_SIZE,
};
pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{group_by_digest, DigestGroup, DigestIndex, DuplicateGroup, GroupingStats};
pub use resolver::{resolve_collisions, resolve_group, GroupResolution, ResolveStats};
