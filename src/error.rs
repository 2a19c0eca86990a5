//! Error types for transform operations.

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error represents a failure while deciding or patching a single resource.
///
/// Any error aborts the whole invocation for that resource; patches produced
/// before the failure are discarded by the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid value for option {option}: {message}")]
    Config { option: String, message: String },

    #[error("invalid patch operation: {0}")]
    Patch(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Machine-readable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Config,
    Patch,
    Serialization,
}

impl Error {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Creates a configuration error for the named option.
    pub fn config(option: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Creates a patch construction error.
    pub fn patch(message: impl Into<String>) -> Self {
        Error::Patch(message.into())
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Config { .. } => ErrorKind::Config,
            Error::Patch(_) => ErrorKind::Patch,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidInput => "invalid-input",
            ErrorKind::Config => "config",
            ErrorKind::Patch => "patch",
            ErrorKind::Serialization => "serialization",
        };
        f.write_str(s)
    }
}
