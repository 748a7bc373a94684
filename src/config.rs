//! Layered run configuration.
//!
//! Settings are merged with figment, later layers winning:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. TOML file: `--config <FILE>`, or `config.toml` in the platform config
//!    directory (e.g. `~/.config/dupverify/config.toml`) if it exists
//! 3. Environment variables prefixed `DUPVERIFY_` (e.g. `DUPVERIFY_IO_THREADS=8`)
//! 4. Command-line flags
//!
//! The merged result is frozen into a [`RunConfig`] that every stage reads.
//!
//! ```toml
//! algorithm = "blake3"
//! io_threads = 8
//! compare_errors = "assume-different"
//! output = "json"
//! trash = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::DeleteMethod;
use crate::cli::Cli;
use crate::duplicates::{CompareErrorPolicy, FinderConfig};
use crate::output::OutputFormat;
use crate::scanner::{DigestAlgorithm, WalkerConfig};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPVERIFY_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or had the wrong shape.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Options that may come from a file or the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Digest used to bucket candidates
    pub algorithm: DigestAlgorithm,
    /// Hashing threads
    pub io_threads: usize,
    /// Verdict for comparisons that fail with an I/O error
    pub compare_errors: CompareErrorPolicy,
    /// Report format
    pub output: OutputFormat,
    /// Move deleted duplicates to the trash instead of removing them
    pub trash: bool,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::Sha256,
            io_threads: 4,
            compare_errors: CompareErrorPolicy::AssumeEqual,
            output: OutputFormat::Text,
            trash: false,
            follow_symlinks: false,
        }
    }
}

impl Settings {
    /// Default config file location for this platform.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupverify").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the layered figment without extracting it.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load settings, using `explicit` as the config file if given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` does not exist, and
    /// [`ConfigError::Invalid`] if any layer fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if path.is_file() => Some(path.to_path_buf()),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        if let Some(ref path) = file {
            log::debug!("Loading config file {}", path.display());
        }

        Self::figment(file.as_deref())
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Root directory to search
    pub target: PathBuf,
    /// File name glob
    pub search_pattern: String,
    /// How to remove duplicates, or `None` to only report
    pub delete: Option<DeleteMethod>,
    /// Report format
    pub output: OutputFormat,
    /// Digest used to bucket candidates
    pub algorithm: DigestAlgorithm,
    /// Hashing threads (at least 1)
    pub io_threads: usize,
    /// Verdict for comparisons that fail with an I/O error
    pub compare_errors: CompareErrorPolicy,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
    /// Suppress progress bars
    pub quiet: bool,
}

impl RunConfig {
    /// Apply command-line flags on top of loaded settings.
    #[must_use]
    pub fn resolve(cli: &Cli, settings: Settings) -> Self {
        let trash = cli.trash || settings.trash;
        Self {
            target: cli.target.clone(),
            search_pattern: cli.search_pattern.clone(),
            delete: cli.delete.then_some(if trash {
                DeleteMethod::Trash
            } else {
                DeleteMethod::Permanent
            }),
            output: cli.output.unwrap_or(settings.output),
            algorithm: cli.algorithm.unwrap_or(settings.algorithm),
            io_threads: cli.io_threads.unwrap_or(settings.io_threads).max(1),
            compare_errors: cli.compare_errors.unwrap_or(settings.compare_errors),
            follow_symlinks: cli.follow_symlinks || settings.follow_symlinks,
            quiet: cli.quiet,
        }
    }

    /// Finder configuration for this run.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_walker_config(
                WalkerConfig::new(&self.search_pattern)
                    .with_follow_symlinks(self.follow_symlinks),
            )
            .with_algorithm(self.algorithm)
            .with_io_threads(self.io_threads)
            .with_compare_error_policy(self.compare_errors)
    }
}
