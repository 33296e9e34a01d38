//! Error types for compartmental model construction and evaluation.

use thiserror::Error;

/// Errors raised by the compartmental model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Contact matrix error: {message}")]
    Contact { message: String },

    #[error("Numeric error: {message}")]
    Numeric { message: String },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<ef_contact::ContactError> for ModelError {
    fn from(e: ef_contact::ContactError) -> Self {
        ModelError::Contact {
            message: e.to_string(),
        }
    }
}

impl From<ef_core::EfError> for ModelError {
    fn from(e: ef_core::EfError) -> Self {
        ModelError::Numeric {
            message: e.to_string(),
        }
    }
}

impl From<ModelError> for ef_sim::SimError {
    fn from(e: ModelError) -> Self {
        ef_sim::SimError::Model {
            message: e.to_string(),
        }
    }
}
