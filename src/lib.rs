//! dupverify - duplicate file finder with exact verification
//!
//! Files under a target directory whose names match a search pattern are
//! digested (SHA-256 by default), bucketed by digest, and every bucket is
//! verified with an all-pairs byte comparison before anything is reported
//! or deleted. Deletion always preserves the first-seen file of a group.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::actions::delete_duplicates;
use crate::cli::Cli;
use crate::config::{RunConfig, Settings};
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{JsonOutput, OutputFormat, TextOutput};
use crate::progress::Progress;

/// Run the application with parsed arguments, writing the report to stdout.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the target cannot be
/// scanned, or the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = RunConfig::resolve(&cli, settings);
    log::debug!("Run configuration: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&config, &mut out)
}

/// Run one scan with a resolved configuration, writing the report to `out`.
///
/// # Errors
///
/// Returns an error if the target cannot be scanned or writing fails.
pub fn run<W: Write>(config: &RunConfig, out: &mut W) -> anyhow::Result<ExitCode> {
    let progress = Arc::new(Progress::new(config.quiet));
    let finder = DuplicateFinder::new(config.finder_config().with_progress_callback(progress));

    let (groups, summary) = finder
        .find_duplicates(&config.target)
        .with_context(|| format!("Failed to scan {}", config.target.display()))?;

    if !summary.scan_errors.is_empty() {
        log::warn!(
            "{} path(s) could not be read during the walk",
            summary.scan_errors.len()
        );
    }

    match config.output {
        OutputFormat::Text => {
            let report = TextOutput::new(&groups, &summary, config.algorithm);
            match config.delete {
                Some(method) => {
                    let deletions = report
                        .write_deleting(out, &method)
                        .context("Failed to write report")?;
                    log::debug!("{}", deletions.summary());
                }
                None => report.write_to(out).context("Failed to write report")?,
            }
        }
        OutputFormat::Json => {
            let deletions = config.delete.map(|method| delete_duplicates(&groups, &method));
            let mut report = JsonOutput::new(&groups, &summary, config.algorithm);
            if let Some(ref deletions) = deletions {
                report = report.with_deletions(deletions);
            }
            report
                .write_to(out, true)
                .context("Failed to write JSON report")?;
        }
    }
    out.flush().context("Failed to flush report")?;

    Ok(ExitCode::Success)
}
