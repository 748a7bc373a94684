//! Plain-text report.
//!
//! ```text
//! Found 1 distinct file with duplicates.
//!
//! Duplicates detected (SHA256 9f86d0...):
//! File: /photos/a.jpg
//! File: /photos/copy/a.jpg
//! Deleted: /photos/copy/a.jpg
//!
//! 1 duplicate file(s), 4.1 KB reclaimable
//! ```
//!
//! When deleting, each group is written and flushed before its redundant
//! copies are removed, so a `Failed to delete` warning on stderr follows the
//! listing of the group it belongs to.

use std::io::{self, Write};

use crate::actions::{delete_group, DeletionReport, FileRemover};
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::DigestAlgorithm;

/// Human-readable report of verified groups.
#[derive(Debug)]
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
    algorithm: DigestAlgorithm,
}

impl<'a> TextOutput<'a> {
    /// Create a report over the verified groups of a scan.
    #[must_use]
    pub fn new(
        groups: &'a [DuplicateGroup],
        summary: &'a ScanSummary,
        algorithm: DigestAlgorithm,
    ) -> Self {
        Self {
            groups,
            summary,
            algorithm,
        }
    }

    /// Write the report without touching any file.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_header(writer)?;
        for group in self.groups {
            self.write_listing(writer, group)?;
            writeln!(writer)?;
        }

        if !self.groups.is_empty() {
            writeln!(
                writer,
                "{} duplicate file(s), {} reclaimable",
                self.summary.duplicate_files,
                self.summary.reclaimable_display()
            )?;
        }
        Ok(())
    }

    /// Write the report, removing each group's redundant copies right after
    /// the group is listed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails. Deletion failures are not errors;
    /// they are recorded in the returned report.
    pub fn write_deleting<W, R>(&self, writer: &mut W, remover: &R) -> io::Result<DeletionReport>
    where
        W: Write,
        R: FileRemover + ?Sized,
    {
        self.write_header(writer)?;

        let mut report = DeletionReport::default();
        for group in self.groups {
            self.write_listing(writer, group)?;
            writer.flush()?;

            let outcome = delete_group(group, remover);
            for deleted in &outcome.deleted {
                writeln!(writer, "Deleted: {}", deleted.path.display())?;
            }
            writeln!(writer)?;
            report.record(outcome);
        }

        writeln!(writer, "{}", report.summary())?;
        Ok(report)
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn write_header<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let count = self.groups.len();
        writeln!(
            writer,
            "Found {} distinct file{} with duplicates.",
            count,
            if count == 1 { "" } else { "s" }
        )?;
        writeln!(writer)
    }

    fn write_listing<W: Write>(&self, writer: &mut W, group: &DuplicateGroup) -> io::Result<()> {
        writeln!(
            writer,
            "Duplicates detected ({} {}):",
            self.algorithm.label(),
            group.hash_hex()
        )?;
        for file in &group.files {
            writeln!(writer, "File: {}", file.path.display())?;
        }
        Ok(())
    }
}
