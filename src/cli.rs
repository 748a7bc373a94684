//! Command-line interface definitions for dupverify.
//!
//! Arguments are defined with the clap derive API. The single-dash,
//! case-insensitive spellings accepted by earlier releases (`-target`,
//! `-searchpattern`, `-delete`) are rewritten by [`normalize_args`] before
//! parsing.
//!
//! # Example
//!
//! ```bash
//! # Report duplicate photos
//! dupverify --target ~/Pictures --searchpattern "*.jpg"
//!
//! # Delete all but the first-seen copy of each
//! dupverify --target ~/Pictures --searchpattern "*.jpg" --delete
//!
//! # Legacy spelling
//! dupverify -target ~/Pictures -searchpattern "*.jpg" -delete
//! ```

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::duplicates::CompareErrorPolicy;
use crate::output::OutputFormat;
use crate::scanner::DigestAlgorithm;

/// Usage lines printed after an argument error.
pub const USAGE_EXAMPLES: &str = "\
USAGE (to search and preserve duplicates): dupverify --target \"/path/to/dir\" --searchpattern \"*.jpg\"
USAGE (to delete duplicates): dupverify --target \"/path/to/dir\" --searchpattern \"*.jpg\" --delete

All argument values should be enclosed in quotes as shown.";

/// Flags that older releases spelled with a single dash.
const LEGACY_FLAGS: [&str; 3] = ["target", "searchpattern", "delete"];

/// Options whose next argument is their value, never a flag.
const VALUE_FLAGS: [&str; 3] = ["--target", "--searchpattern", "--search-pattern"];

/// Find duplicate files by content digest, verified byte-for-byte.
///
/// Files under the target directory whose names match the search pattern
/// are digested; files sharing a digest are compared exactly before being
/// reported as duplicates. With --delete, all but the first-seen copy of
/// each group are removed.
#[derive(Debug, Parser)]
#[command(name = "dupverify")]
#[command(author, version, about, long_about = None)]
#[command(after_help = USAGE_EXAMPLES)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory to search recursively
    #[arg(
        long,
        value_name = "DIR",
        value_parser = parse_existing_dir,
        allow_hyphen_values = true
    )]
    pub target: PathBuf,

    /// File name pattern (`*` and `?` wildcards), e.g. "*.jpg"
    #[arg(
        long = "searchpattern",
        visible_alias = "search-pattern",
        value_name = "GLOB",
        allow_hyphen_values = true
    )]
    pub search_pattern: String,

    /// Delete all but the first-seen file of each duplicate group
    #[arg(long)]
    pub delete: bool,

    /// Move deleted files to the system trash instead of removing them
    #[arg(long, requires = "delete")]
    pub trash: bool,

    /// Report format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Digest used to find candidate duplicates
    #[arg(long, value_enum)]
    pub algorithm: Option<DigestAlgorithm>,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// How an unreadable pair is treated during byte comparison
    #[arg(long, value_enum, value_name = "POLICY")]
    pub compare_errors: Option<CompareErrorPolicy>,

    /// Follow symbolic links during the walk
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Accept only paths naming an existing directory.
///
/// # Errors
///
/// Returns a message if the path is missing or not a directory.
pub fn parse_existing_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if !path.exists() {
        return Err(format!("directory not found: {s}"));
    }
    if !path.is_dir() {
        return Err(format!("not a directory: {s}"));
    }
    Ok(path)
}

/// Rewrite legacy single-dash flags to their long form.
///
/// `-target`, `-TARGET` and `--Target` all become `--target`; an attached
/// `=value` is kept. Every other argument passes through untouched.
///
/// ```
/// use dupverify::cli::normalize_args;
///
/// let args = normalize_args(["dupverify", "-Target", "/tmp", "-delete"]);
/// assert_eq!(args, ["dupverify", "--target", "/tmp", "--delete"]);
/// ```
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut out: Vec<OsString> = args.next().into_iter().collect();
    let mut takes_value = false;
    for arg in args {
        if takes_value {
            takes_value = false;
            out.push(arg);
            continue;
        }
        let arg = normalize_one(arg);
        takes_value = arg.to_str().is_some_and(|a| VALUE_FLAGS.contains(&a));
        out.push(arg);
    }
    out
}

fn normalize_one(arg: OsString) -> OsString {
    let Some(text) = arg.to_str() else {
        return arg;
    };
    let Some(flag) = text
        .strip_prefix("--")
        .or_else(|| text.strip_prefix('-'))
    else {
        return arg;
    };

    let (name, value) = match flag.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (flag, None),
    };
    let lowered = name.to_ascii_lowercase();
    if !LEGACY_FLAGS.contains(&lowered.as_str()) {
        return arg;
    }

    match value {
        Some(value) => format!("--{lowered}={value}").into(),
        None => format!("--{lowered}").into(),
    }
}
