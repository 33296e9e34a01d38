//! Error types for simulation runs.

use thiserror::Error;

/// Errors encountered while driving a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Model evaluation failed: {message}")]
    Model { message: String },
}

pub type SimResult<T> = Result<T, SimError>;
