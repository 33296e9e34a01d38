//! Transient simulation framework for compartmental epidemic models.
//!
//! Provides:
//! - `TransientModel` trait: the derivative-evaluator contract integrators
//!   depend on
//! - Fixed-step RK4 and forward Euler integrators
//! - Simulation runner with decimated recording
//! - Ensemble driver: independent sampled runs in parallel, reproducible
//!   under a fixed seed
//! - Ensemble statistics (mean, percentiles)

pub mod analyze;
pub mod ensemble;
pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;

// Re-exports for public API
pub use analyze::{ensemble_mean, ensemble_percentile};
pub use ensemble::{EnsembleModel, EnsembleOptions, run_ensemble};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::TransientModel;
pub use sim::{IntegratorType, SimOptions, SimRecord, run_sim};
