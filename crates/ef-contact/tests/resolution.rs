//! Integration tests: damping resolution through the full contact stack.

use ef_contact::{
    ContactMatrix, ContactMatrixGroup, Damping, DampingKind, UncertainContactMatrix,
};
use nalgebra::DMatrix;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn single_group_intervention_scenario() {
    // one group, baseline 2.0, contact halved from day 5 on
    let mut matrix = ContactMatrix::constant(1, 2.0).unwrap();
    matrix
        .add_constant_damping(0.5, 5.0, DampingKind::Overriding, 0)
        .unwrap();

    assert_eq!(matrix.at(0.0)[(0, 0)], 2.0);
    assert_eq!(matrix.at(5.0)[(0, 0)], 1.0);
    assert_eq!(matrix.at(100.0)[(0, 0)], 1.0);
}

#[test]
fn lockdown_then_reopening_timeline() {
    let mut group = ContactMatrixGroup::new(1, 2).unwrap();
    group[0] = ContactMatrix::constant(2, 10.0).unwrap();
    // lockdown at day 30, partial reopening at day 60
    group
        .add_damping(Damping::constant(2, 0.7, 30.0, DampingKind::Overriding, 0).unwrap())
        .unwrap();
    group
        .add_damping(Damping::constant(2, 0.3, 60.0, DampingKind::Overriding, 0).unwrap())
        .unwrap();

    assert_eq!(group.at(0.0)[(0, 1)], 10.0);
    assert!((group.at(45.0)[(0, 1)] - 3.0).abs() < 1e-12);
    assert!((group.at(90.0)[(0, 1)] - 7.0).abs() < 1e-12);
}

#[test]
fn per_pair_damping_matrix_only_hits_selected_pairs() {
    let mut matrix = ContactMatrix::constant(2, 1.0).unwrap();
    let mut coeffs = DMatrix::zeros(2, 2);
    coeffs[(0, 0)] = 0.8;
    matrix
        .add_damping(Damping::new(35.0, DampingKind::Overriding, 0, coeffs).unwrap())
        .unwrap();

    let effective = matrix.at(40.0);
    assert!((effective[(0, 0)] - 0.2).abs() < 1e-12);
    assert_eq!(effective[(0, 1)], 1.0);
    assert_eq!(effective[(1, 0)], 1.0);
    assert_eq!(effective[(1, 1)], 1.0);
}

#[test]
fn sampled_realizations_respect_bounds_across_many_draws() {
    let home = ContactMatrix::constant(3, 2.0).unwrap();
    let work = ContactMatrix::constant(3, 4.0).unwrap();
    let group = ContactMatrixGroup::from_matrices(vec![home, work]).unwrap();
    let mut ucm = UncertainContactMatrix::new(group);
    ucm.set_bounds(
        0,
        DMatrix::from_element(3, 3, 1.0),
        DMatrix::from_element(3, 3, 3.0),
    )
    .unwrap();
    ucm.set_bounds(
        1,
        DMatrix::from_element(3, 3, 3.0),
        DMatrix::from_element(3, 3, 5.0),
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..200 {
        let realization = ucm.draw_sample(&mut rng);
        for (index, bounds) in [(0, (1.0, 3.0)), (1, (3.0, 5.0))] {
            for &v in realization[index].baseline().iter() {
                assert!(v >= bounds.0 && v <= bounds.1);
            }
        }
    }
}

#[test]
fn serialization_round_trip_preserves_resolution() {
    let mut matrix = ContactMatrix::constant(2, 6.0).unwrap();
    matrix
        .add_constant_damping(0.25, 10.0, DampingKind::Overriding, 0)
        .unwrap();
    matrix
        .add_constant_damping(0.1, 20.0, DampingKind::Cumulative, 1)
        .unwrap();
    let group = ContactMatrixGroup::from_matrices(vec![matrix]).unwrap();
    let ucm = UncertainContactMatrix::new(group);

    let json = serde_json::to_string(&ucm).unwrap();
    let restored: UncertainContactMatrix = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, ucm);
    for t in [0.0, 10.0, 15.0, 20.0, 50.0] {
        assert_eq!(restored.group().at(t), ucm.group().at(t));
    }
}
