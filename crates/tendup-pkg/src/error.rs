//! Error types for tendup-pkg

use tendup_exec::ExecError;
use thiserror::Error;

/// Errors that can occur during package operations
#[derive(Error, Debug, Clone)]
pub enum PackageError {
    /// Package manager not found on system
    #[error("package manager not found: {0}")]
    ManagerNotFound(String),

    /// Command exited with a non-zero status
    #[error("`{command}` exited with status {status}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Exit status
        status: i32,
    },

    /// Failed to parse command output
    #[error("parse error: {0}")]
    ParseError(String),

    /// Execution error from the command executor
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// Release metadata could not be fetched
    #[error("failed to query release feed {url}: {message}")]
    ReleaseFeed {
        /// Endpoint that was queried
        url: String,
        /// Underlying error
        message: String,
    },

    /// Artifact download failed
    #[error("download of {url} failed: {message}")]
    DownloadFailed {
        /// Artifact URL
        url: String,
        /// Underlying error
        message: String,
    },

    /// Archive extraction failed
    #[error("extracting {archive} failed with status {status}")]
    ExtractFailed {
        /// Archive path
        archive: String,
        /// Exit status of the extraction command
        status: i32,
    },
}

impl From<ExecError> for PackageError {
    fn from(err: ExecError) -> Self {
        PackageError::ExecutionError(err.to_string())
    }
}
