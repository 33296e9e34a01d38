//! Initial-condition builder with per-group total bookkeeping.

use crate::error::{ModelError, ModelResult};
use crate::layout::StateLayout;
use ef_core::ensure_nonnegative;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Compartment occupancies for every group, used to assemble the initial
/// state of a simulation.
///
/// The usual setup pattern assigns the small compartments explicitly
/// (exposed, infected, recovered, ...) and then lets
/// [`Population::set_difference_from_group_total`] fill the susceptible
/// compartment with whatever remains of the group's census total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    layout: StateLayout,
    values: DVector<f64>,
}

impl Population {
    /// All-zero population for the given layout.
    pub fn new(layout: StateLayout) -> Self {
        Self {
            values: DVector::zeros(layout.len()),
            layout,
        }
    }

    pub fn layout(&self) -> StateLayout {
        self.layout
    }

    pub fn get(&self, group: usize, compartment: usize) -> f64 {
        self.values[self.layout.index(group, compartment)]
    }

    /// Set one compartment occupancy; must be finite and non-negative.
    pub fn set(&mut self, group: usize, compartment: usize, value: f64) -> ModelResult<()> {
        ensure_nonnegative(value, "compartment occupancy")?;
        let idx = self.layout.index(group, compartment);
        self.values[idx] = value;
        Ok(())
    }

    /// Assign `compartment` the remainder that makes the group sum to
    /// `total`. Fails when the other compartments already exceed the total —
    /// an over-allocated group is a configuration error, not something to
    /// clamp silently.
    pub fn set_difference_from_group_total(
        &mut self,
        group: usize,
        compartment: usize,
        total: f64,
    ) -> ModelResult<()> {
        ensure_nonnegative(total, "group total")?;
        let idx = self.layout.index(group, compartment);
        let others = self.layout.group_total(&self.values, group) - self.values[idx];
        if others > total {
            return Err(ModelError::InvalidArg {
                what: "compartments already exceed the requested group total",
            });
        }
        self.values[idx] = total - others;
        Ok(())
    }

    /// Total occupancy of one group.
    pub fn group_total(&self, group: usize) -> f64 {
        self.layout.group_total(&self.values, group)
    }

    /// Total occupancy over all groups.
    pub fn total(&self) -> f64 {
        self.values.sum()
    }

    /// The flat state vector view used by the evaluator.
    pub fn as_vector(&self) -> &DVector<f64> {
        &self.values
    }
}
