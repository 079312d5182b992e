//! Error types for sessions, backends and the server.

use std::fmt;

use stepviz_model::{AlgorithmKind, Operation, StructuralViolation};
use thiserror::Error;

/// Result type for session and server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of a session.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation was requested with no algorithm selected
    #[error("No algorithm selected")]
    InvalidSelection,

    /// The execution backend failed; session state is unchanged
    #[error("Generation failed for {kind} {operation}: {message}")]
    GenerationFailure {
        kind: AlgorithmKind,
        operation: Operation,
        message: String,
        #[source]
        cause: BackendError,
    },

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn generation(kind: AlgorithmKind, operation: Operation, cause: BackendError) -> Self {
        Error::GenerationFailure {
            kind,
            operation,
            message: cause.to_string(),
            cause,
        }
    }

    /// The backend failure behind a [`Error::GenerationFailure`].
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            Error::GenerationFailure { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Failures reported by an [`ExecutionBackend`](crate::ExecutionBackend).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// The backend refused the request
    #[error("{0}")]
    Rejected(String),

    /// The operation is not offered by the algorithm's category
    #[error("Operation {operation} not supported for {kind}")]
    Unsupported {
        kind: AlgorithmKind,
        operation: Operation,
    },

    /// The generator produced a sequence that failed validation
    #[error("Invalid sequence: {0}")]
    Structural(#[from] StructuralViolation),
}

impl BackendError {
    pub fn rejected(message: impl fmt::Display) -> Self {
        BackendError::Rejected(message.to_string())
    }
}
