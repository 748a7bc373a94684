//! Duplicate finder orchestration.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the complete detection pipeline:
//!
//! 1. **Walk** - Enumerate files matching the search pattern, in sorted
//!    traversal order.
//! 2. **Hash** - Digest every file on a bounded I/O thread pool. Results are
//!    collected back in traversal order, so "first seen" does not depend on
//!    thread scheduling. Files that cannot be read are skipped with a warning.
//! 3. **Group** - Bucket files by digest and prune unique digests.
//! 4. **Resolve** - Byte-compare every pair in each bucket and discard
//!    collided members.
//!
//! The finder never deletes anything; see [`crate::actions`].

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::compare::{ByteComparator, CompareErrorPolicy, ContentComparator};
use super::groups::{group_by_digest, DuplicateGroup};
use super::resolver::resolve_collisions;
use crate::progress::ProgressCallback;
use crate::scanner::{
    walker::compile_pattern, DigestAlgorithm, FileEntry, Hash, HashError, Hasher, ScanError,
    Walker, WalkerConfig,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Digest used to bucket candidates.
    pub algorithm: DigestAlgorithm,
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Verdict for comparisons that fail with an I/O error.
    pub compare_error_policy: CompareErrorPolicy,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("algorithm", &self.algorithm)
            .field("io_threads", &self.io_threads)
            .field("compare_error_policy", &self.compare_error_policy)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            algorithm: DigestAlgorithm::default(),
            io_threads: 4,
            compare_error_policy: CompareErrorPolicy::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the I/O thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the comparison error policy.
    #[must_use]
    pub fn with_compare_error_policy(mut self, policy: CompareErrorPolicy) -> Self {
        self.compare_error_policy = policy;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files yielded by the walker
    pub total_files: usize,
    /// Total size of all walked files in bytes
    pub total_size: u64,
    /// Files successfully digested
    pub hashed_files: usize,
    /// Files skipped because they could not be digested
    pub failed_files: usize,
    /// Digests seen exactly once
    pub unique_digests: usize,
    /// Buckets with 2+ files before collision resolution
    pub candidate_groups: usize,
    /// Files removed by collision resolution
    pub collided_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding the kept copies)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Time spent digesting files
    pub hash_duration: Duration,
    /// Time spent resolving collisions
    pub resolve_duration: Duration,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Errors encountered while walking
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(std::path::PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(std::path::PathBuf),

    /// A scan error that prevents the walk from starting.
    #[error(transparent)]
    ScanError(#[from] ScanError),
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// # Example
///
/// ```no_run
/// use dupverify::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let config = FinderConfig::default().with_io_threads(4);
/// let finder = DuplicateFinder::new(config);
///
/// let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
///
/// println!("Found {} duplicate groups", summary.duplicate_groups);
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
    comparator: Arc<dyn ContentComparator>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::new(config.algorithm);
        let comparator = Arc::new(ByteComparator::new(config.compare_error_policy));
        Self {
            config,
            hasher,
            comparator,
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Replace the content comparator used during collision resolution.
    #[must_use]
    pub fn with_comparator(mut self, comparator: Arc<dyn ContentComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Find all duplicate files below `path`.
    ///
    /// Returns confirmed duplicate groups, in the order their digest was
    /// first seen, along with summary statistics.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist
    /// - The path is not a directory
    /// - The search pattern is invalid
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        compile_pattern(&self.config.walker_config.search_pattern)?;

        log::info!(
            "Starting duplicate scan of {} (pattern {})",
            path.display(),
            self.config.walker_config.search_pattern
        );

        let callback = self.config.progress_callback.as_deref();
        if let Some(callback) = callback {
            callback.on_phase_start("walking", 0);
        }

        let walker = Walker::new(path, self.config.walker_config.clone());
        let mut files = Vec::new();
        let mut scan_errors = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if let Some(callback) = callback {
                        let path = file.path.to_string_lossy();
                        callback.on_progress(files.len() + 1, path.as_ref());
                    }
                    files.push(file);
                }
                Err(e) => scan_errors.push(e),
            }
        }

        if let Some(callback) = callback {
            callback.on_phase_end("walking");
        }
        log::debug!(
            "Walk of {} found {} matching files ({} errors)",
            walker.root().display(),
            files.len(),
            scan_errors.len()
        );

        let (groups, mut summary) = self.find_duplicates_from_files(files);
        summary.scan_errors = scan_errors;
        Ok((groups, summary))
    }

    /// Run the hash, group and resolve stages over an already collected
    /// file list. `files` must be in traversal order.
    #[must_use]
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        let start_time = Instant::now();
        let mut summary = ScanSummary {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            ..ScanSummary::default()
        };

        log::info!("Hashing files...");
        let hash_start = Instant::now();
        let hashed = self.hash_files(files, &mut summary);
        summary.hash_duration = hash_start.elapsed();
        log::info!("Done in {} ms.", summary.hash_duration.as_millis());

        let (candidates, grouping) = group_by_digest(hashed);
        summary.unique_digests = grouping.unique_digests;
        summary.candidate_groups = grouping.candidate_groups;

        log::info!("Detecting hash collisions...");
        let resolve_start = Instant::now();
        let (groups, resolve_stats) = resolve_collisions(candidates, self.comparator.as_ref());
        summary.resolve_duration = resolve_start.elapsed();
        log::info!("Done in {} ms.", summary.resolve_duration.as_millis());

        summary.collided_files = resolve_stats.collided_files;
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} reclaimable",
            summary.total_files,
            summary.duplicate_groups,
            summary.reclaimable_display()
        );

        (groups, summary)
    }

    /// Digest every file, preserving input order in the output.
    fn hash_files(
        &self,
        files: Vec<FileEntry>,
        summary: &mut ScanSummary,
    ) -> Vec<(FileEntry, Hash)> {
        let total = files.len();
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("hashing", total);
        }

        let done = AtomicUsize::new(0);
        let hash_one = |file: FileEntry| {
            let result = self.hasher.full_hash(&file.path);
            if let Some(ref callback) = self.config.progress_callback {
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                callback.on_progress(current, file.path.to_string_lossy().as_ref());
                callback.on_item_completed(file.size);
            }
            (file, result)
        };

        let results: Vec<(FileEntry, Result<Hash, HashError>)> =
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.io_threads)
                .build()
            {
                Ok(pool) => pool.install(|| files.into_par_iter().map(hash_one).collect()),
                Err(e) => {
                    log::warn!("Failed to create I/O thread pool ({e}), hashing serially");
                    files.into_iter().map(hash_one).collect()
                }
            };

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("hashing");
        }

        let mut hashed = Vec::with_capacity(results.len());
        for (file, result) in results {
            match result {
                Ok(hash) => hashed.push((file, hash)),
                Err(e) => {
                    log::warn!(
                        "Could not obtain hash for {}: {}",
                        file.path.display(),
                        e
                    );
                    summary.failed_files += 1;
                }
            }
        }
        summary.hashed_files = hashed.len();
        hashed
    }
}
