//! A contact matrix group with element-wise baseline uncertainty bounds.

use crate::error::{ContactError, ContactResult};
use crate::group::ContactMatrixGroup;
use nalgebra::DMatrix;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Wraps the current [`ContactMatrixGroup`] realization together with
/// per-member element-wise minimum/maximum baseline matrices.
///
/// Contact surveys carry measurement error; the min/max matrices bracket it.
/// `draw_sample` realizes a new baseline group within those bounds while the
/// damping timelines carry over unchanged. Invariant:
/// `min <= baseline <= max` element-wise for every member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertainContactMatrix {
    group: ContactMatrixGroup,
    min_baselines: Vec<DMatrix<f64>>,
    max_baselines: Vec<DMatrix<f64>>,
}

impl UncertainContactMatrix {
    /// Wrap a deterministic group: both bounds default to the member
    /// baselines, i.e. no uncertainty until bounds are widened.
    pub fn new(group: ContactMatrixGroup) -> Self {
        let baselines: Vec<DMatrix<f64>> =
            group.iter().map(|m| m.baseline().clone()).collect();
        Self {
            min_baselines: baselines.clone(),
            max_baselines: baselines,
            group,
        }
    }

    /// Zero-initialized group of the given shape with zero-width bounds.
    pub fn zeros(num_matrices: usize, num_groups: usize) -> ContactResult<Self> {
        Ok(Self::new(ContactMatrixGroup::new(num_matrices, num_groups)?))
    }

    /// The current deterministic realization used by the derivative evaluator.
    pub fn group(&self) -> &ContactMatrixGroup {
        &self.group
    }

    /// Mutable access for setup (baselines, dampings). Re-validate bounds via
    /// `set_bounds` after changing baselines.
    pub fn group_mut(&mut self) -> &mut ContactMatrixGroup {
        &mut self.group
    }

    pub fn min_baseline(&self, index: usize) -> Option<&DMatrix<f64>> {
        self.min_baselines.get(index)
    }

    pub fn max_baseline(&self, index: usize) -> Option<&DMatrix<f64>> {
        self.max_baselines.get(index)
    }

    /// Install element-wise baseline bounds for member `index`.
    ///
    /// Fails with `DimensionMismatch` when the two bound matrices disagree in
    /// shape or do not match the group dimension, and with `InvalidRange` when
    /// `min > max` anywhere, a bound is negative or non-finite, or the current
    /// baseline falls outside the bracket.
    pub fn set_bounds(
        &mut self,
        index: usize,
        min: DMatrix<f64>,
        max: DMatrix<f64>,
    ) -> ContactResult<()> {
        if index >= self.group.num_matrices() {
            return Err(ContactError::InvalidArg {
                what: "matrix index out of range",
            });
        }
        if min.nrows() != max.nrows() || min.ncols() != max.ncols() {
            return Err(ContactError::DimensionMismatch {
                what: "min and max baseline matrices disagree in shape",
                expected: min.nrows(),
                got: max.nrows(),
            });
        }
        let n = self.group.num_groups();
        if min.nrows() != n || min.ncols() != n {
            return Err(ContactError::DimensionMismatch {
                what: "baseline bounds do not match group dimension",
                expected: n,
                got: min.nrows(),
            });
        }
        for (&lo, &hi) in min.iter().zip(max.iter()) {
            if !lo.is_finite() || !hi.is_finite() || lo < 0.0 {
                return Err(ContactError::InvalidRange {
                    what: "baseline bounds must be finite and non-negative",
                });
            }
            if lo > hi {
                return Err(ContactError::InvalidRange {
                    what: "min baseline exceeds max baseline",
                });
            }
        }
        let baseline = self.group[index].baseline();
        for ((&lo, &hi), &b) in min.iter().zip(max.iter()).zip(baseline.iter()) {
            if b < lo || b > hi {
                return Err(ContactError::InvalidRange {
                    what: "current baseline lies outside the new bounds",
                });
            }
        }
        self.min_baselines[index] = min;
        self.max_baselines[index] = max;
        Ok(())
    }

    /// Draw a new baseline realization: every element uniform within its
    /// `[min, max]` interval, damping timelines carried over unchanged.
    ///
    /// Called once per ensemble run before integration starts, never inside a
    /// running simulation.
    pub fn draw_sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &ContactMatrixGroup {
        for index in 0..self.group.num_matrices() {
            let min = &self.min_baselines[index];
            let max = &self.max_baselines[index];
            let baseline = min.zip_map(max, |lo, hi| {
                if hi > lo {
                    rng.gen_range(lo..=hi)
                } else {
                    lo
                }
            });
            // within validated [min, max], hence non-negative and finite
            self.group[index].replace_baseline_unchecked(baseline);
        }
        &self.group
    }
}
