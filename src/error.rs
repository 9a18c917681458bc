//! Error types for the crocus library.

use thiserror::Error;

/// The error type for all crocus operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrocusError {
    /// An index fell outside the addressable range of a structure.
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// An argument violated a documented precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An index structure is malformed or internally inconsistent.
    #[error("Index error: {0}")]
    Index(String),

    /// The operation is not valid for the receiver's state or capabilities.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Any other error.
    #[error("Error: {0}")]
    Other(String),
}

impl CrocusError {
    /// Create an out-of-bounds error.
    pub fn out_of_bounds<S: Into<String>>(message: S) -> Self {
        CrocusError::OutOfBounds(message.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        CrocusError::InvalidArgument(message.into())
    }

    /// Create an index error.
    pub fn index<S: Into<String>>(message: S) -> Self {
        CrocusError::Index(message.into())
    }

    /// Create an invalid-operation error.
    pub fn invalid_operation<S: Into<String>>(message: S) -> Self {
        CrocusError::InvalidOperation(message.into())
    }

    /// Create a generic error.
    pub fn other<S: Into<String>>(message: S) -> Self {
        CrocusError::Other(message.into())
    }
}

/// A specialized `Result` type for crocus operations.
pub type Result<T> = std::result::Result<T, CrocusError>;
