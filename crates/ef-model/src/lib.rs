//! Generic compartmental epidemic model with contact-driven transmission.
//!
//! Provides:
//! - `StateLayout`: (group, compartment) indexing into flat state vectors
//! - `Population`: initial-condition builder with group-total bookkeeping
//! - `Transition` / `RateLaw`: compartment flows as configuration data —
//!   per-capita rates or contact-matrix-driven force of infection
//! - `CompartmentalModel`: the pure derivative evaluator coupling the
//!   uncertain contact matrix to the compartment flows, pluggable into the
//!   ef-sim integrators and ensemble driver

pub mod error;
pub mod layout;
pub mod model;
pub mod population;
pub mod transition;

pub use error::{ModelError, ModelResult};
pub use layout::StateLayout;
pub use model::CompartmentalModel;
pub use population::Population;
pub use transition::{InfectiousSource, RateLaw, Transition, per_group};
