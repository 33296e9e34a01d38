//! Flat-vector indexing over (group, compartment) pairs.

use crate::error::{ModelError, ModelResult};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Shape of a compartmental state vector: `num_groups` population groups,
/// each holding `num_compartments` occupancy values.
///
/// States are stored group-block-wise: element `(g, c)` lives at
/// `g * num_compartments + c`, so one group's compartments are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLayout {
    num_groups: usize,
    num_compartments: usize,
}

impl StateLayout {
    pub fn new(num_groups: usize, num_compartments: usize) -> ModelResult<Self> {
        if num_groups == 0 {
            return Err(ModelError::InvalidArg {
                what: "num_groups must be at least 1",
            });
        }
        if num_compartments == 0 {
            return Err(ModelError::InvalidArg {
                what: "num_compartments must be at least 1",
            });
        }
        Ok(Self {
            num_groups,
            num_compartments,
        })
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn num_compartments(&self) -> usize {
        self.num_compartments
    }

    /// Length of a state vector with this layout.
    pub fn len(&self) -> usize {
        self.num_groups * self.num_compartments
    }

    /// Flat index of `(group, compartment)`. Panics on out-of-range indices,
    /// matching slice indexing semantics.
    pub fn index(&self, group: usize, compartment: usize) -> usize {
        assert!(group < self.num_groups, "group index out of range");
        assert!(
            compartment < self.num_compartments,
            "compartment index out of range"
        );
        group * self.num_compartments + compartment
    }

    /// Total occupancy of one group at the given state.
    pub fn group_total(&self, state: &DVector<f64>, group: usize) -> f64 {
        let start = self.index(group, 0);
        (start..start + self.num_compartments).map(|i| state[i]).sum()
    }
}
