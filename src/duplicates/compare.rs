//! Exact byte comparison of two files.
//!
//! # Overview
//!
//! A digest match only makes two files *probably* identical. Before any
//! destructive action the collision resolver asks a [`ContentComparator`]
//! whether two candidates differ. [`ByteComparator`] answers that by:
//!
//! 1. Comparing file sizes. Different sizes are different files, and no
//!    content is read.
//! 2. Reading both files in lock-step, [`CHUNK_SIZE`] bytes at a time, and
//!    comparing each chunk pair as a single 64-bit word. The first unequal
//!    word short-circuits the comparison.
//!
//! Each chunk is filled completely unless end-of-file is reached, so a
//! short read in the middle of a file cannot shift one stream against the
//! other. When the final chunk is short, its unread tail is zeroed in both
//! buffers before the word compare, so the last bytes are always validated
//! on their own and never against leftovers of the previous chunk.
//!
//! I/O errors during comparison are resolved by a [`CompareErrorPolicy`].
//! The default, [`CompareErrorPolicy::AssumeEqual`], treats the pair as
//! "not different".

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Bytes compared per step (one 64-bit word).
pub const CHUNK_SIZE: usize = 8;

/// Read buffer behind each compared stream.
const STREAM_BUFFER_SIZE: usize = 64 * 1024;

/// What a comparison reports when reading either file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CompareErrorPolicy {
    /// Fail open: an unreadable pair counts as "not different".
    #[default]
    AssumeEqual,
    /// Fail closed: an unreadable pair counts as "different".
    AssumeDifferent,
}

impl CompareErrorPolicy {
    /// Verdict used when a comparison could not be completed.
    #[must_use]
    pub fn verdict(self) -> bool {
        matches!(self, Self::AssumeDifferent)
    }
}

/// Decides whether two files have different content.
pub trait ContentComparator: Send + Sync {
    /// Returns `true` if the files at `a` and `b` are proven different.
    fn differ(&self, a: &Path, b: &Path) -> bool;
}

/// Word-at-a-time exact comparator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteComparator {
    error_policy: CompareErrorPolicy,
}

impl ByteComparator {
    /// Create a comparator with the given error policy.
    #[must_use]
    pub fn new(error_policy: CompareErrorPolicy) -> Self {
        Self { error_policy }
    }

    /// The configured error policy.
    #[must_use]
    pub fn error_policy(&self) -> CompareErrorPolicy {
        self.error_policy
    }

    /// Compare two files, propagating I/O errors.
    ///
    /// Returns `Ok(true)` if the files differ.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while reading metadata, opening, or
    /// reading either file.
    pub fn compare(&self, a: &Path, b: &Path) -> io::Result<bool> {
        let len_a = fs::metadata(a)?.len();
        let len_b = fs::metadata(b)?.len();
        if len_a != len_b {
            log::trace!(
                "Size mismatch ({} vs {}): {} / {}",
                len_a,
                len_b,
                a.display(),
                b.display()
            );
            return Ok(true);
        }

        let reader_a = BufReader::with_capacity(STREAM_BUFFER_SIZE, File::open(a)?);
        let reader_b = BufReader::with_capacity(STREAM_BUFFER_SIZE, File::open(b)?);
        compare_streams(reader_a, reader_b)
    }
}

impl ContentComparator for ByteComparator {
    fn differ(&self, a: &Path, b: &Path) -> bool {
        match self.compare(a, b) {
            Ok(different) => different,
            Err(e) => {
                let verdict = self.error_policy.verdict();
                log::debug!(
                    "Comparison of {} and {} failed ({}); treating as {}",
                    a.display(),
                    b.display(),
                    e,
                    if verdict { "different" } else { "equal" }
                );
                verdict
            }
        }
    }
}

/// Compare two streams word by word until both are exhausted.
///
/// Returns `Ok(true)` at the first differing word, or if one stream ends
/// before the other.
///
/// # Errors
///
/// Propagates read errors from either stream.
pub fn compare_streams<A: Read, B: Read>(mut a: A, mut b: B) -> io::Result<bool> {
    let mut chunk_a = [0u8; CHUNK_SIZE];
    let mut chunk_b = [0u8; CHUNK_SIZE];

    loop {
        let filled_a = fill_chunk(&mut a, &mut chunk_a)?;
        let filled_b = fill_chunk(&mut b, &mut chunk_b)?;

        if filled_a != filled_b {
            return Ok(true);
        }
        if filled_a == 0 {
            return Ok(false);
        }
        if filled_a < CHUNK_SIZE {
            chunk_a[filled_a..].fill(0);
            chunk_b[filled_b..].fill(0);
        }

        if u64::from_ne_bytes(chunk_a) != u64::from_ne_bytes(chunk_b) {
            return Ok(true);
        }
    }
}

/// Read until `chunk` is full or the stream ends. Returns bytes read.
fn fill_chunk<R: Read>(reader: &mut R, chunk: &mut [u8; CHUNK_SIZE]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < CHUNK_SIZE {
        match reader.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
