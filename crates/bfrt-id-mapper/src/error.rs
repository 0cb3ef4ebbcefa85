//! Error types for ID mapper operations.

use bfrt::BfRtError;
use std::fmt;
use thiserror::Error;

/// Result type alias for ID mapper operations.
pub type IdMapperResult<T> = Result<T, IdMapperError>;

/// Coarse status code for callers that translate errors to RPC status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    AlreadyExists,
    InvalidParam,
    Unavailable,
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::InvalidParam => "INVALID_PARAM",
            ErrorCode::Unavailable => "UNAVAILABLE",
            ErrorCode::Internal => "INTERNAL",
        };
        write!(f, "{}", s)
    }
}

/// Errors that can occur while building or querying a mapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdMapperError {
    /// A lookup key has no mapping entry.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing key.
        what: String,
    },

    /// A registry entry already exists.
    #[error("{what} already exists")]
    AlreadyExists {
        /// Description of the duplicate key.
        what: String,
    },

    /// The pushed pipeline cannot be mapped consistently.
    #[error("Invalid pipeline: {message}")]
    InvalidPipeline {
        /// Error message.
        message: String,
    },

    /// The driver metadata could not be read.
    #[error("Driver metadata error: {0}")]
    Driver(#[from] BfRtError),
}

impl IdMapperError {
    /// Creates a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        IdMapperError::NotFound { what: what.into() }
    }

    /// Creates an already exists error.
    pub fn already_exists(what: impl Into<String>) -> Self {
        IdMapperError::AlreadyExists { what: what.into() }
    }

    /// Creates an invalid pipeline error.
    pub fn invalid_pipeline(message: impl Into<String>) -> Self {
        IdMapperError::InvalidPipeline {
            message: message.into(),
        }
    }

    /// Returns the status code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            IdMapperError::NotFound { .. } => ErrorCode::NotFound,
            IdMapperError::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            IdMapperError::InvalidPipeline { .. } => ErrorCode::InvalidParam,
            IdMapperError::Driver(e) if e.is_retryable() => ErrorCode::Unavailable,
            IdMapperError::Driver(_) => ErrorCode::Internal,
        }
    }

    /// Returns true if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::NotFound
    }
}
