//! Time-damped, uncertain contact matrices between population groups.
//!
//! Provides:
//! - `Damping` / `Dampings`: intervention events reducing contact from a given
//!   simulation time onward, with overriding and cumulative combination
//! - `ContactMatrix`: a baseline group-to-group contact-rate matrix plus its
//!   damping timeline, resolvable to an effective matrix at any query time
//! - `ContactMatrixGroup`: several contact matrices (e.g. home, work, school)
//!   summed into one total effective matrix
//! - `UncertainContactMatrix`: a group realization bracketed by element-wise
//!   min/max baselines, re-sampleable per ensemble run

pub mod damping;
pub mod error;
pub mod group;
pub mod matrix;
pub mod uncertain;

pub use damping::{Damping, DampingKind, Dampings};
pub use error::{ContactError, ContactResult};
pub use group::ContactMatrixGroup;
pub use matrix::ContactMatrix;
pub use uncertain::UncertainContactMatrix;
