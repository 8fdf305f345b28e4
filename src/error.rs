//! Crate error type.

use thiserror::Error;

/// Errors returned by the curve-fitting API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveFitError {
    /// A caller-supplied argument violates a documented precondition.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An index or parameter fell outside the valid range for the target.
    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}

impl CurveFitError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CurveFitError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        CurveFitError::OutOfRange { index, len }
    }
}

/// Convenience alias for results produced by this crate.
pub type CurveFitResult<T> = Result<T, CurveFitError>;
