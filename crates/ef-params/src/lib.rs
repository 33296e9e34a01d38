//! Uncertain model parameters for epidemic simulations.
//!
//! Provides:
//! - `ParameterDistribution`: sampleable uncertainty descriptors with bounds
//! - `UncertainValue`: a current scalar value plus an optional owned distribution
//!
//! Sampling always goes through a caller-supplied random source so ensemble
//! runs stay reproducible under a fixed seed and never contend on a shared RNG.

pub mod distribution;
pub mod error;
pub mod uncertain;

pub use distribution::ParameterDistribution;
pub use error::{ParamError, ParamResult};
pub use uncertain::UncertainValue;
