//! Logging setup.
//!
//! All diagnostics go through the `log` facade and are written to stderr by
//! `env_logger`, leaving stdout for the report. The level is chosen by (in
//! priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Default: info, which includes the phase timing lines and every
//!    skipped-file warning
//!
//! Without `-v` the output reads like a plain console tool: phase lines are
//! printed bare and problems carry a `WARNING:` or `ERROR:` prefix. With
//! `-v` every record gets a timestamp, level and module path.
//!
//! ```rust,no_run
//! use dupverify::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("Now visible");
//! ```

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::{Level, LevelFilter};

/// Initialize logging from CLI verbosity flags.
///
/// Call once, before any log output. Later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = determine_level(verbose, quiet);
    let from_env = env::var_os("RUST_LOG").is_some();

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level);
    }

    if verbose == 0 {
        builder.format(|buf, record| {
            writeln!(buf, "{}{}", console_prefix(record.level()), record.args())
        });
    } else {
        builder.format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        });
    }

    match builder.try_init() {
        Ok(()) if !from_env => log::debug!("Log level: {level}"),
        Ok(()) => log::debug!("Log filter taken from RUST_LOG"),
        Err(_) => {}
    }
}

/// Map CLI flags to a level. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Line prefix used by the compact console format.
fn console_prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR: ",
        Level::Warn => "WARNING: ",
        Level::Info => "",
        Level::Debug => "debug: ",
        Level::Trace => "trace: ",
    }
}
