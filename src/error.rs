use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Precondition failed: '{expected}' not found in {}", .path.display())]
    Precondition { path: PathBuf, expected: String },

    #[error("Command `{command}` failed with {status}\nStdout: {stdout}\nStderr: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Required tool not found on PATH: {program}")]
    ToolNotFound { program: String },

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Docs error: {0}")]
    Docs(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in flutter-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a precondition error for a substring missing from a file
    pub fn precondition(path: impl Into<PathBuf>, expected: impl Into<String>) -> Self {
        ReleaseError::Precondition {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Create a docs error with context
    pub fn docs(msg: impl Into<String>) -> Self {
        ReleaseError::Docs(msg.into())
    }

    /// True when the error is the old-version presence check failing
    pub fn is_precondition(&self) -> bool {
        matches!(self, ReleaseError::Precondition { .. })
    }
}
