//! Integration tests: an age-stratified SEIR model driven end-to-end through
//! the integrators and the ensemble driver.

use ef_contact::{ContactMatrix, ContactMatrixGroup, DampingKind, UncertainContactMatrix};
use ef_model::{
    CompartmentalModel, InfectiousSource, Population, StateLayout, Transition, per_group,
};
use ef_params::{ParameterDistribution, UncertainValue};
use ef_sim::{EnsembleOptions, SimOptions, ensemble_percentile, run_ensemble, run_sim};
use nalgebra::DMatrix;

const S: usize = 0;
const E: usize = 1;
const I: usize = 2;
const R: usize = 3;

const NUM_GROUPS: usize = 2;

/// Two-group SEIR with plausible literature values: 5.2 day incubation,
/// 6 day infectious period, contact rate 10/day split evenly across groups.
fn seir_with_transmission(transmission: Vec<UncertainValue>) -> CompartmentalModel {
    let layout = StateLayout::new(NUM_GROUPS, 4).unwrap();
    let per_pair_rate = 10.0 / NUM_GROUPS as f64;
    let group = ContactMatrixGroup::from_matrices(vec![
        ContactMatrix::constant(NUM_GROUPS, per_pair_rate).unwrap(),
    ])
    .unwrap();

    let mut initial = Population::new(layout);
    for g in 0..NUM_GROUPS {
        initial.set(g, I, 10.0).unwrap();
        initial.set_difference_from_group_total(g, S, 1000.0).unwrap();
    }

    let mut model =
        CompartmentalModel::new(layout, UncertainContactMatrix::new(group), initial).unwrap();
    model
        .add_transition(Transition::force_of_infection(
            S,
            E,
            transmission,
            vec![InfectiousSource {
                compartment: I,
                infectivity: per_group(NUM_GROUPS, 1.0),
            }],
        ))
        .unwrap();
    model
        .add_transition(Transition::per_capita(E, I, per_group(NUM_GROUPS, 1.0 / 5.2)))
        .unwrap();
    model
        .add_transition(Transition::per_capita(I, R, per_group(NUM_GROUPS, 1.0 / 6.0)))
        .unwrap();
    model
}

fn seir_model() -> CompartmentalModel {
    seir_with_transmission(per_group(NUM_GROUPS, 0.05))
}

/// As `seir_model`, but transmission probability and contact baselines carry
/// uncertainty for ensemble sampling.
fn uncertain_seir() -> CompartmentalModel {
    let transmission: Vec<UncertainValue> = (0..NUM_GROUPS)
        .map(|_| {
            UncertainValue::with_distribution(
                0.05,
                ParameterDistribution::normal(0.03, 0.07, 0.05, 0.01).unwrap(),
            )
        })
        .collect();
    let mut model = seir_with_transmission(transmission);

    // contact baseline uncertain within ±20%
    let rate = 10.0 / NUM_GROUPS as f64;
    model
        .contact_mut()
        .set_bounds(
            0,
            DMatrix::from_element(NUM_GROUPS, NUM_GROUPS, 0.8 * rate),
            DMatrix::from_element(NUM_GROUPS, NUM_GROUPS, 1.2 * rate),
        )
        .unwrap();
    model
}

fn sim_options() -> SimOptions {
    SimOptions {
        dt: 0.1,
        t_end: 50.0,
        record_every: 10,
        ..SimOptions::default()
    }
}

fn recovered_at_end(record: &ef_sim::SimRecord, model: &CompartmentalModel) -> f64 {
    (0..NUM_GROUPS)
        .map(|g| record.last_state().unwrap()[model.layout().index(g, R)])
        .sum()
}

#[test]
fn total_population_is_conserved() {
    let model = seir_model();
    let record = run_sim(&model, &sim_options()).unwrap();
    let initial_total = record.x[0].sum();
    for state in &record.x {
        assert!((state.sum() - initial_total).abs() < 1e-6 * initial_total);
    }
}

#[test]
fn epidemic_grows_from_seeded_infections() {
    let model = seir_model();
    let record = run_sim(&model, &sim_options()).unwrap();
    // R0 = 10 * 0.05 * 6 = 3: far more than the 20 seeded cases recover
    assert!(recovered_at_end(&record, &model) > 500.0);
}

#[test]
fn lockdown_damping_shrinks_the_epidemic() {
    let model = seir_model();
    let baseline = run_sim(&model, &sim_options()).unwrap();

    let mut damped_model = seir_model();
    damped_model.contact_mut().group_mut()[0]
        .add_constant_damping(0.8, 10.0, DampingKind::Overriding, 0)
        .unwrap();
    let damped = run_sim(&damped_model, &sim_options()).unwrap();

    assert!(
        recovered_at_end(&damped, &damped_model) < 0.5 * recovered_at_end(&baseline, &model)
    );
}

#[test]
fn integrators_agree_on_the_trajectory() {
    let model = seir_model();
    let rk4 = run_sim(&model, &sim_options()).unwrap();
    let euler = run_sim(
        &model,
        &SimOptions {
            dt: 0.001,
            integrator: ef_sim::IntegratorType::ForwardEuler,
            record_every: 1000,
            ..sim_options()
        },
    )
    .unwrap();
    let last_rk4 = rk4.last_state().unwrap();
    let last_euler = euler.last_state().unwrap();
    for i in 0..last_rk4.len() {
        assert!((last_rk4[i] - last_euler[i]).abs() < 5.0);
    }
}

#[test]
fn ensembles_are_reproducible_under_a_fixed_seed() {
    let model = uncertain_seir();
    let opts = EnsembleOptions {
        num_runs: 8,
        seed: 314,
        sim: SimOptions {
            t_end: 20.0,
            ..sim_options()
        },
    };
    let a = run_ensemble(&model, &opts).unwrap();
    let b = run_ensemble(&model, &opts).unwrap();
    assert_eq!(a, b);

    let other = run_ensemble(
        &model,
        &EnsembleOptions {
            seed: 315,
            ..opts
        },
    )
    .unwrap();
    assert_ne!(a, other);
}

#[test]
fn ensemble_percentiles_bracket_the_median() {
    let model = uncertain_seir();
    let opts = EnsembleOptions {
        num_runs: 16,
        seed: 7,
        sim: SimOptions {
            t_end: 30.0,
            ..sim_options()
        },
    };
    let results = run_ensemble(&model, &opts).unwrap();

    let p05 = ensemble_percentile(&results, 0.05).unwrap();
    let p50 = ensemble_percentile(&results, 0.50).unwrap();
    let p95 = ensemble_percentile(&results, 0.95).unwrap();

    for k in 0..p50.len() {
        for e in 0..p50.x[k].len() {
            assert!(p05.x[k][e] <= p50.x[k][e]);
            assert!(p50.x[k][e] <= p95.x[k][e]);
        }
    }
}

#[test]
fn model_survives_a_serialization_round_trip() {
    let mut model = uncertain_seir();
    model
        .add_damping(
            ef_contact::Damping::constant(NUM_GROUPS, 0.7, 30.0, DampingKind::Overriding, 0)
                .unwrap(),
        )
        .unwrap();

    let json = serde_json::to_string(&model).unwrap();
    let restored: CompartmentalModel = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, model);

    // distributions do not take part in value equality; check them explicitly
    let ef_model::RateLaw::ForceOfInfection { transmission, .. } = &restored.transitions()[0].rate
    else {
        panic!("first transition should be the infection flow");
    };
    assert!(transmission.iter().all(|v| v.has_distribution()));

    let state = restored.initial().as_vector().clone();
    for t in [0.0, 15.0, 35.0] {
        assert_eq!(
            restored.derivative(&state, t).unwrap(),
            model.derivative(&state, t).unwrap()
        );
    }
}
