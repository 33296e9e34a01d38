//! A baseline contact-rate matrix with its damping timeline.

use crate::damping::{Damping, DampingKind, Dampings};
use crate::error::{ContactError, ContactResult};
use ef_core::ensure_nonnegative;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Group-to-group baseline contact rates plus the damping events acting on
/// them.
///
/// The baseline is square (dimension = number of population groups) and
/// non-negative; symmetry is conventional (contact is mutual) but not
/// enforced numerically. The dimension is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMatrix {
    baseline: DMatrix<f64>,
    dampings: Dampings,
}

impl ContactMatrix {
    /// Contact matrix with the given baseline and no dampings.
    pub fn new(baseline: DMatrix<f64>) -> ContactResult<Self> {
        check_baseline(&baseline)?;
        let num_groups = baseline.nrows();
        Ok(Self {
            baseline,
            dampings: Dampings::new(num_groups),
        })
    }

    /// Matrix with the same contact rate between every group pair.
    pub fn constant(num_groups: usize, rate: f64) -> ContactResult<Self> {
        if num_groups == 0 {
            return Err(ContactError::InvalidArg {
                what: "num_groups must be at least 1",
            });
        }
        Self::new(DMatrix::from_element(num_groups, num_groups, rate))
    }

    /// All-zero baseline (used for group pre-allocation).
    pub fn zeros(num_groups: usize) -> ContactResult<Self> {
        Self::constant(num_groups, 0.0)
    }

    pub fn num_groups(&self) -> usize {
        self.baseline.nrows()
    }

    pub fn baseline(&self) -> &DMatrix<f64> {
        &self.baseline
    }

    /// Replace the baseline; the dimension must stay the same and all rates
    /// must be non-negative.
    pub fn set_baseline(&mut self, baseline: DMatrix<f64>) -> ContactResult<()> {
        check_baseline(&baseline)?;
        if baseline.nrows() != self.num_groups() {
            return Err(ContactError::DimensionMismatch {
                what: "baseline dimension is fixed at construction",
                expected: self.num_groups(),
                got: baseline.nrows(),
            });
        }
        self.baseline = baseline;
        Ok(())
    }

    /// Internal baseline swap for sampling: dimension and non-negativity are
    /// guaranteed by the caller's bound invariants.
    pub(crate) fn replace_baseline_unchecked(&mut self, baseline: DMatrix<f64>) {
        self.baseline = baseline;
    }

    pub fn dampings(&self) -> &Dampings {
        &self.dampings
    }

    /// Insert a damping event into this matrix's timeline.
    pub fn add_damping(&mut self, damping: Damping) -> ContactResult<()> {
        self.dampings.add(damping)
    }

    /// Insert a damping that reduces every group pair by the same factor.
    pub fn add_constant_damping(
        &mut self,
        value: f64,
        time: f64,
        kind: DampingKind,
        level: u32,
    ) -> ContactResult<()> {
        let damping = Damping::constant(self.num_groups(), value, time, kind, level)?;
        self.dampings.add(damping)
    }

    /// The effective contact matrix at `time`:
    /// baseline ⊙ (1 − active damping), floored at zero.
    pub fn at(&self, time: f64) -> DMatrix<f64> {
        let active = self.dampings.active_at(time);
        self.baseline
            .zip_map(&active, |b, d| b * (1.0 - d).max(0.0))
    }
}

fn check_baseline(baseline: &DMatrix<f64>) -> ContactResult<()> {
    if baseline.nrows() != baseline.ncols() {
        return Err(ContactError::DimensionMismatch {
            what: "baseline contact matrix must be square",
            expected: baseline.nrows(),
            got: baseline.ncols(),
        });
    }
    if baseline.is_empty() {
        return Err(ContactError::InvalidArg {
            what: "baseline contact matrix must be non-empty",
        });
    }
    for &rate in baseline.iter() {
        ensure_nonnegative(rate, "baseline contact rate")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undamped_matrix_returns_baseline() {
        let m = ContactMatrix::constant(2, 3.5).unwrap();
        assert_eq!(m.at(0.0), DMatrix::from_element(2, 2, 3.5));
        assert_eq!(m.at(100.0), m.baseline().clone());
    }

    #[test]
    fn damping_halves_contact_from_event_time() {
        let mut m = ContactMatrix::constant(1, 2.0).unwrap();
        m.add_constant_damping(0.5, 5.0, DampingKind::Overriding, 0)
            .unwrap();

        assert_eq!(m.at(0.0)[(0, 0)], 2.0);
        assert_eq!(m.at(5.0)[(0, 0)], 1.0);
        assert_eq!(m.at(100.0)[(0, 0)], 1.0);
    }

    #[test]
    fn full_damping_suppresses_contact_entirely() {
        let mut m = ContactMatrix::constant(1, 7.0).unwrap();
        m.add_constant_damping(1.0, 0.0, DampingKind::Overriding, 0)
            .unwrap();
        assert_eq!(m.at(1.0)[(0, 0)], 0.0);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let mut m = ContactMatrix::constant(3, 1.25).unwrap();
        m.add_constant_damping(0.3, 2.0, DampingKind::Cumulative, 0)
            .unwrap();
        assert_eq!(m.at(4.0), m.at(4.0));
    }

    #[test]
    fn rejects_non_square_baseline() {
        let err = ContactMatrix::new(DMatrix::from_element(2, 3, 1.0)).unwrap_err();
        assert!(matches!(err, ContactError::DimensionMismatch { .. }));
    }

    #[test]
    fn rejects_negative_rates() {
        assert!(ContactMatrix::new(DMatrix::from_element(2, 2, -1.0)).is_err());
    }

    #[test]
    fn set_baseline_keeps_dimension_fixed() {
        let mut m = ContactMatrix::constant(2, 1.0).unwrap();
        assert!(m.set_baseline(DMatrix::from_element(2, 2, 4.0)).is_ok());
        assert!(m.set_baseline(DMatrix::from_element(3, 3, 4.0)).is_err());
    }
}
