//! dupverify - duplicate file finder with exact verification
//!
//! Entry point for the dupverify CLI application.

use clap::error::ErrorKind;
use clap::Parser;
use dupverify::{
    cli::{normalize_args, Cli, USAGE_EXAMPLES},
    error::ExitCode,
    logging::init_logging,
};

fn main() {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Argument errors exit with 1 rather than clap's default of 2.
            let _ = err.print();
            eprintln!("\n{USAGE_EXAMPLES}");
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    init_logging(cli.verbose, cli.quiet);

    match dupverify::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}
