//! Output formatters for duplicate scan results.
//!
//! - Text, laid out for reading in a terminal
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupverify::duplicates::DuplicateFinder;
//! use dupverify::output::TextOutput;
//! use dupverify::scanner::DigestAlgorithm;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! print!("{}", TextOutput::new(&groups, &summary, DigestAlgorithm::Sha256).render());
//! ```

pub mod json;
pub mod text;

use serde::{Deserialize, Serialize};

pub use json::{JsonOutput, JsonOutputError, JsonSummary};
pub use text::TextOutput;

/// Report format written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}
