//! Exit code definitions for s3-upload
//!
//! Scripts only need to tell success from failure, so every failure class
//! shares one code.

use upload_core::Error;

/// Exit codes for the s3-upload binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Upload completed successfully
    Success = 0,

    /// Invalid flags, missing credentials, unknown method or a failed collaborator
    GeneralError = 1,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Exit code for an error that ended the run
    pub const fn from_error(err: &Error) -> Self {
        match err.exit_code() {
            0 => Self::Success,
            _ => Self::GeneralError,
        }
    }
}
