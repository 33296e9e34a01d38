//! Error types for contact-matrix operations.

use thiserror::Error;

/// Errors raised by contact matrices, dampings and their groups.
#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid range: {what}")]
    InvalidRange { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Numeric error: {message}")]
    Numeric { message: String },
}

pub type ContactResult<T> = Result<T, ContactError>;

impl From<ef_core::EfError> for ContactError {
    fn from(e: ef_core::EfError) -> Self {
        ContactError::Numeric {
            message: e.to_string(),
        }
    }
}
