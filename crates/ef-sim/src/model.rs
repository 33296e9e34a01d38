//! TransientModel trait for pluggable compartmental dynamics.

use crate::error::SimResult;
use nalgebra::DVector;

/// The derivative-evaluator contract an integrator steps against.
///
/// `rhs` must be a pure function of `(t, x)` and the model's fixed structural
/// parameters: no mutation of parameters, no hidden sampling, bit-identical
/// output for identical inputs. Uncertainty is realized between runs (see
/// [`crate::EnsembleModel`]), never during integration.
///
/// Evaluators are expected to return finite derivatives even at degenerate
/// states (empty groups, zero occupancy) — those are normal transients, not
/// errors.
pub trait TransientModel {
    /// Length of the state vector.
    fn dim(&self) -> usize;

    /// The initial state at the start of a run.
    fn initial_state(&self) -> DVector<f64>;

    /// Compute the state derivative dx/dt = f(t, x).
    fn rhs(&self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>>;
}
