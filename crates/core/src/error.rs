//! Error types for upload-core
//!
//! Every failure, whatever its class, ends the process with the same exit code.
//! The variants keep the classes apart for logging and tests.

use thiserror::Error;

/// Result type alias for upload-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for upload operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid command-line arguments
    #[error("Usage error: {0}")]
    Usage(String),

    /// Upload method is neither `cli` nor `sdk`
    #[error("Unknown upload method: {0}")]
    UnknownMethod(String),

    /// Required environment variable is unset or empty
    #[error("Env var {0} not set")]
    MissingEnv(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Storage service request failed
    #[error("Network error: {0}")]
    Network(String),

    /// External upload tool failed
    #[error("Upload tool error: {0}")]
    Tool(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the process exit code for this error
    ///
    /// There are no partial-failure semantics: every error is fatal with code 1.
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Usage("test".into()).exit_code(), 1);
        assert_eq!(Error::UnknownMethod("ftp".into()).exit_code(), 1);
        assert_eq!(Error::MissingEnv("AWS_ACCESS_KEY_ID").exit_code(), 1);
        assert_eq!(Error::Network("test".into()).exit_code(), 1);
        assert_eq!(Error::Tool("test".into()).exit_code(), 1);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::MissingEnv("AWS_SECRET_ACCESS_KEY");
        assert_eq!(err.to_string(), "Env var AWS_SECRET_ACCESS_KEY not set");

        let err = Error::UnknownMethod("ftp".into());
        assert_eq!(err.to_string(), "Unknown upload method: ftp");
    }
}
