//! Error types for parameter distributions.

use thiserror::Error;

/// Errors raised when constructing parameter distributions.
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("Invalid range: lower bound {lower} exceeds upper bound {upper}")]
    InvalidRange { lower: f64, upper: f64 },

    #[error("Degenerate sample space: {what}")]
    DegenerateSample { what: &'static str },

    #[error("Non-finite parameter for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ParamResult<T> = Result<T, ParamError>;
