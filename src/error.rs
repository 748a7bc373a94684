//! Exit codes.

use serde::Serialize;

/// Process exit codes for dupverify.
///
/// - 0: Success (completed normally, whether or not duplicates were found)
/// - 1: General error (bad arguments, unreadable target, unexpected failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::SUCCESS,
            ExitCode::GeneralError => Self::FAILURE,
        }
    }
}
