//! Built-in SEIR demo scenario with home/other contact channels.

use crate::CliResult;
use ef_contact::{ContactMatrix, ContactMatrixGroup, DampingKind, UncertainContactMatrix};
use ef_model::{
    CompartmentalModel, InfectiousSource, Population, StateLayout, Transition, per_group,
};
use ef_params::{ParameterDistribution, UncertainValue};

pub const SUSCEPTIBLE: usize = 0;
pub const EXPOSED: usize = 1;
pub const INFECTED: usize = 2;
pub const RECOVERED: usize = 3;

pub const COMPARTMENT_NAMES: [&str; 4] = ["susceptible", "exposed", "infected", "recovered"];

/// Scenario knobs exposed on the command line.
#[derive(Clone, Copy, Debug)]
pub struct ScenarioOptions {
    pub num_groups: usize,
    /// Census total per group
    pub total_per_group: f64,
    /// Initially infected per group
    pub seeded_infections: f64,
    /// Intervention as (day, reduction factor); applied to the non-home
    /// contact channel only
    pub damping: Option<(f64, f64)>,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            num_groups: 3,
            total_per_group: 10_000.0,
            seeded_infections: 50.0,
            damping: Some((30.0, 0.7)),
        }
    }
}

/// SEIR with a 5.2 day incubation and 6 day infectious period; total contact
/// rate 10/day split into a home channel (30%) and an other channel (70%),
/// transmission probability uncertain in [0.03, 0.07], contact baselines
/// uncertain within ±20%.
pub fn build(opts: &ScenarioOptions) -> CliResult<CompartmentalModel> {
    let n = opts.num_groups;
    let layout = StateLayout::new(n, COMPARTMENT_NAMES.len())?;

    let per_pair = 10.0 / n as f64;
    let home = ContactMatrix::constant(n, 0.3 * per_pair)?;
    let mut other = ContactMatrix::constant(n, 0.7 * per_pair)?;
    if let Some((day, factor)) = opts.damping {
        // lockdowns suppress work/school/leisure contact; household contact stays
        other.add_constant_damping(factor, day, DampingKind::Overriding, 0)?;
    }
    let baselines = [home.baseline().clone(), other.baseline().clone()];
    let group = ContactMatrixGroup::from_matrices(vec![home, other])?;

    let mut contact = UncertainContactMatrix::new(group);
    for (index, baseline) in baselines.into_iter().enumerate() {
        contact.set_bounds(index, baseline.map(|v| 0.8 * v), baseline.map(|v| 1.2 * v))?;
    }

    let mut initial = Population::new(layout);
    for g in 0..n {
        initial.set(g, INFECTED, opts.seeded_infections)?;
        initial.set_difference_from_group_total(g, SUSCEPTIBLE, opts.total_per_group)?;
    }

    let mut model = CompartmentalModel::new(layout, contact, initial)?;

    let transmission_dist = ParameterDistribution::normal(0.03, 0.07, 0.05, 0.01)?;
    let transmission: Vec<UncertainValue> = (0..n)
        .map(|_| UncertainValue::with_distribution(0.05, transmission_dist.clone()))
        .collect();
    model.add_transition(Transition::force_of_infection(
        SUSCEPTIBLE,
        EXPOSED,
        transmission,
        vec![InfectiousSource {
            compartment: INFECTED,
            infectivity: per_group(n, 1.0),
        }],
    ))?;
    model.add_transition(Transition::per_capita(
        EXPOSED,
        INFECTED,
        per_group(n, 1.0 / 5.2),
    ))?;
    model.add_transition(Transition::per_capita(
        INFECTED,
        RECOVERED,
        per_group(n, 1.0 / 6.0),
    ))?;

    Ok(model)
}
