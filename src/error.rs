//! error
//!
//! The crate-wide error taxonomy.
//!
//! Five kinds cover every failure the engine can report. Callers that sit
//! behind a transport map [`ErrorKind`] to status codes; the variants carry
//! enough context for an operator-facing message without leaking command
//! lines.
//!
//! Timeouts are always reported as [`Error::Timeout`], never folded into
//! [`Error::ToolFailure`]: every classification site checks the timeout
//! flag before anything else.

use thiserror::Error;

use crate::core::types::TypeError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the introspection engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller's input failed validation before any subprocess ran.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The named revision, path, object, or repository does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The object exists but its kind does not support the operation.
    #[error("unsupported object: {message}")]
    UnsupportedObject { message: String },

    /// The tool ran and failed for a reason other than absence.
    #[error("tool failed during {context} (exit {exit_code}): {stderr}")]
    ToolFailure {
        context: String,
        exit_code: i32,
        stderr: String,
    },

    /// The tool exceeded its wall-clock budget and was killed.
    #[error("tool timed out during {context} after {seconds}s")]
    Timeout { context: String, seconds: u64 },
}

/// Coarse classification of an [`Error`], for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    UnsupportedObject,
    ToolFailure,
    Timeout,
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedObject {
            message: message.into(),
        }
    }

    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::UnsupportedObject { .. } => ErrorKind::UnsupportedObject,
            Error::ToolFailure { .. } => ErrorKind::ToolFailure,
            Error::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::InvalidInput {
            message: err.to_string(),
        }
    }
}
