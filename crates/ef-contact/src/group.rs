//! An ordered collection of contact matrices summed into one total.

use crate::damping::Damping;
use crate::error::{ContactError, ContactResult};
use crate::matrix::ContactMatrix;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Several contact matrices over the same groups, one per transmission
/// channel (e.g. home, work, school), whose effective matrices are summed.
///
/// All members share one group dimension, fixed by the first member and
/// checked on every insertion — never per query. Serialized as the plain
/// member list; loading re-checks the dimension invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ContactMatrix>", into = "Vec<ContactMatrix>")]
pub struct ContactMatrixGroup {
    matrices: Vec<ContactMatrix>,
}

impl TryFrom<Vec<ContactMatrix>> for ContactMatrixGroup {
    type Error = ContactError;

    fn try_from(matrices: Vec<ContactMatrix>) -> ContactResult<Self> {
        Self::from_matrices(matrices)
    }
}

impl From<ContactMatrixGroup> for Vec<ContactMatrix> {
    fn from(group: ContactMatrixGroup) -> Self {
        group.matrices
    }
}

impl ContactMatrixGroup {
    /// Group of `num_matrices` zero-baseline matrices, to be filled in by
    /// indexed assignment.
    pub fn new(num_matrices: usize, num_groups: usize) -> ContactResult<Self> {
        if num_matrices == 0 {
            return Err(ContactError::InvalidArg {
                what: "a contact matrix group needs at least one member",
            });
        }
        let mut matrices = Vec::with_capacity(num_matrices);
        for _ in 0..num_matrices {
            matrices.push(ContactMatrix::zeros(num_groups)?);
        }
        Ok(Self { matrices })
    }

    /// Group from existing matrices; all must agree on the group dimension.
    pub fn from_matrices(matrices: Vec<ContactMatrix>) -> ContactResult<Self> {
        let Some(first) = matrices.first() else {
            return Err(ContactError::InvalidArg {
                what: "a contact matrix group needs at least one member",
            });
        };
        let num_groups = first.num_groups();
        for m in &matrices {
            if m.num_groups() != num_groups {
                return Err(ContactError::DimensionMismatch {
                    what: "group members disagree on group count",
                    expected: num_groups,
                    got: m.num_groups(),
                });
            }
        }
        Ok(Self { matrices })
    }

    pub fn num_matrices(&self) -> usize {
        self.matrices.len()
    }

    pub fn num_groups(&self) -> usize {
        self.matrices[0].num_groups()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactMatrix> {
        self.matrices.iter()
    }

    /// Append a member; its dimension must match the group's.
    pub fn push(&mut self, matrix: ContactMatrix) -> ContactResult<()> {
        if matrix.num_groups() != self.num_groups() {
            return Err(ContactError::DimensionMismatch {
                what: "pushed matrix disagrees on group count",
                expected: self.num_groups(),
                got: matrix.num_groups(),
            });
        }
        self.matrices.push(matrix);
        Ok(())
    }

    /// Replace a member, keeping the dimension invariant.
    pub fn set(&mut self, index: usize, matrix: ContactMatrix) -> ContactResult<()> {
        if index >= self.matrices.len() {
            return Err(ContactError::InvalidArg {
                what: "matrix index out of range",
            });
        }
        if matrix.num_groups() != self.num_groups() {
            return Err(ContactError::DimensionMismatch {
                what: "replacement matrix disagrees on group count",
                expected: self.num_groups(),
                got: matrix.num_groups(),
            });
        }
        self.matrices[index] = matrix;
        Ok(())
    }

    /// Insert the same damping event into every member's timeline.
    pub fn add_damping(&mut self, damping: Damping) -> ContactResult<()> {
        if damping.num_groups() != self.num_groups() {
            return Err(ContactError::DimensionMismatch {
                what: "damping dimension does not match group",
                expected: self.num_groups(),
                got: damping.num_groups(),
            });
        }
        for m in &mut self.matrices {
            m.add_damping(damping.clone())?;
        }
        Ok(())
    }

    /// The total effective contact matrix at `time`: the element-wise sum of
    /// every member's effective matrix.
    pub fn at(&self, time: f64) -> DMatrix<f64> {
        let n = self.num_groups();
        let mut total = DMatrix::zeros(n, n);
        for m in &self.matrices {
            total += m.at(time);
        }
        total
    }
}

impl Index<usize> for ContactMatrixGroup {
    type Output = ContactMatrix;

    fn index(&self, index: usize) -> &ContactMatrix {
        &self.matrices[index]
    }
}

/// Mutable member access for in-place setup (baselines, dampings). Assigning
/// a whole matrix of a different dimension breaks the group invariant — use
/// [`ContactMatrixGroup::set`] for checked replacement.
impl IndexMut<usize> for ContactMatrixGroup {
    fn index_mut(&mut self, index: usize) -> &mut ContactMatrix {
        &mut self.matrices[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damping::DampingKind;

    #[test]
    fn sum_of_two_undamped_members() {
        let a = ContactMatrix::constant(2, 1.5).unwrap();
        let b = ContactMatrix::constant(2, 2.0).unwrap();
        let group = ContactMatrixGroup::from_matrices(vec![a, b]).unwrap();

        for t in [-5.0, 0.0, 42.0] {
            assert_eq!(group.at(t), DMatrix::from_element(2, 2, 3.5));
        }
    }

    #[test]
    fn member_dampings_damp_only_their_channel() {
        let mut work = ContactMatrix::constant(1, 4.0).unwrap();
        work.add_constant_damping(0.5, 10.0, DampingKind::Overriding, 0)
            .unwrap();
        let home = ContactMatrix::constant(1, 1.0).unwrap();
        let group = ContactMatrixGroup::from_matrices(vec![home, work]).unwrap();

        assert_eq!(group.at(0.0)[(0, 0)], 5.0);
        assert_eq!(group.at(10.0)[(0, 0)], 3.0);
    }

    #[test]
    fn group_damping_applies_to_all_members() {
        let mut group = ContactMatrixGroup::new(2, 1).unwrap();
        group.set(0, ContactMatrix::constant(1, 2.0).unwrap()).unwrap();
        group.set(1, ContactMatrix::constant(1, 3.0).unwrap()).unwrap();
        group
            .add_damping(Damping::constant(1, 0.5, 7.0, DampingKind::Overriding, 0).unwrap())
            .unwrap();

        assert_eq!(group.at(0.0)[(0, 0)], 5.0);
        assert_eq!(group.at(8.0)[(0, 0)], 2.5);
    }

    #[test]
    fn mismatched_members_are_rejected() {
        let a = ContactMatrix::constant(3, 1.0).unwrap();
        let b = ContactMatrix::constant(2, 1.0).unwrap();
        let err = ContactMatrixGroup::from_matrices(vec![a, b]).unwrap_err();
        assert!(matches!(err, ContactError::DimensionMismatch { .. }));
    }

    #[test]
    fn empty_group_is_rejected() {
        assert!(ContactMatrixGroup::from_matrices(vec![]).is_err());
        assert!(ContactMatrixGroup::new(0, 3).is_err());
    }

    #[test]
    fn indexed_assignment_fills_preallocated_group() {
        let mut group = ContactMatrixGroup::new(1, 2).unwrap();
        group[0] = ContactMatrix::constant(2, 10.0).unwrap();
        assert_eq!(group.at(0.0), DMatrix::from_element(2, 2, 10.0));
    }

    #[test]
    fn push_checks_dimension() {
        let mut group = ContactMatrixGroup::new(1, 2).unwrap();
        assert!(group.push(ContactMatrix::constant(2, 1.0).unwrap()).is_ok());
        assert!(group.push(ContactMatrix::constant(4, 1.0).unwrap()).is_err());
        assert_eq!(group.num_matrices(), 2);
    }
}
