//! Compartment transitions as configuration data.

use crate::error::{ModelError, ModelResult};
use crate::layout::StateLayout;
use ef_params::UncertainValue;
use serde::{Deserialize, Serialize};

/// One infectious compartment contributing to transmission, weighted by a
/// per-group relative infectivity (e.g. pre-symptomatic carriers infecting at
/// 67% of the symptomatic rate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfectiousSource {
    pub compartment: usize,
    /// Relative infectivity per group, length = number of groups.
    pub infectivity: Vec<UncertainValue>,
}

/// The rate expression of one transition.
///
/// A closed set: disease topologies differ in how they wire transitions
/// together, not in the kinds of rate law they use, so the evaluator matches
/// exhaustively instead of dispatching over model subtypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RateLaw {
    /// flow[g] = rates[g] · state[source, g] — waiting-time style transitions
    /// (incubation, recovery, death), one uncertain rate per group.
    PerCapita { rates: Vec<UncertainValue> },
    /// flow[g] = transmission[g] · λ[g] · state[source, g], where λ[g] is the
    /// per-group force of infection assembled from the effective contact
    /// matrix and the infectious compartments' occupancy.
    ForceOfInfection {
        /// Probability of infection per contact, per susceptible group.
        transmission: Vec<UncertainValue>,
        /// Infectious compartments feeding transmission.
        sources: Vec<InfectiousSource>,
    },
}

/// A directed flow between two compartments, applied per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub source: usize,
    pub target: usize,
    pub rate: RateLaw,
}

impl Transition {
    /// Waiting-time transition with one uncertain per-capita rate per group.
    pub fn per_capita(source: usize, target: usize, rates: Vec<UncertainValue>) -> Self {
        Self {
            source,
            target,
            rate: RateLaw::PerCapita { rates },
        }
    }

    /// Contact-driven infection transition.
    pub fn force_of_infection(
        source: usize,
        target: usize,
        transmission: Vec<UncertainValue>,
        sources: Vec<InfectiousSource>,
    ) -> Self {
        Self {
            source,
            target,
            rate: RateLaw::ForceOfInfection {
                transmission,
                sources,
            },
        }
    }

    /// Check compartment indices and per-group vector lengths against the
    /// model layout. Run once when the transition is added, not per
    /// evaluation.
    pub fn validate(&self, layout: &StateLayout) -> ModelResult<()> {
        let nc = layout.num_compartments();
        let ng = layout.num_groups();
        if self.source >= nc || self.target >= nc {
            return Err(ModelError::InvalidArg {
                what: "transition compartment index out of range",
            });
        }
        if self.source == self.target {
            return Err(ModelError::InvalidArg {
                what: "transition source and target must differ",
            });
        }
        match &self.rate {
            RateLaw::PerCapita { rates } => {
                if rates.len() != ng {
                    return Err(ModelError::DimensionMismatch {
                        what: "per-capita rates must have one entry per group",
                        expected: ng,
                        got: rates.len(),
                    });
                }
            }
            RateLaw::ForceOfInfection {
                transmission,
                sources,
            } => {
                if transmission.len() != ng {
                    return Err(ModelError::DimensionMismatch {
                        what: "transmission probabilities must have one entry per group",
                        expected: ng,
                        got: transmission.len(),
                    });
                }
                if sources.is_empty() {
                    return Err(ModelError::InvalidArg {
                        what: "force of infection needs at least one infectious source",
                    });
                }
                for src in sources {
                    if src.compartment >= nc {
                        return Err(ModelError::InvalidArg {
                            what: "infectious source compartment index out of range",
                        });
                    }
                    if src.infectivity.len() != ng {
                        return Err(ModelError::DimensionMismatch {
                            what: "infectivity must have one entry per group",
                            expected: ng,
                            got: src.infectivity.len(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// One certain value replicated for every group — the common case when a
/// parameter is not group-stratified.
pub fn per_group(num_groups: usize, value: f64) -> Vec<UncertainValue> {
    vec![UncertainValue::new(value); num_groups]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_per_capita_transition() {
        let layout = StateLayout::new(2, 3).unwrap();
        let tr = Transition::per_capita(1, 2, per_group(2, 1.0 / 6.0));
        assert!(tr.validate(&layout).is_ok());
    }

    #[test]
    fn wrong_rate_count_is_rejected() {
        let layout = StateLayout::new(3, 3).unwrap();
        let tr = Transition::per_capita(1, 2, per_group(2, 0.5));
        assert!(matches!(
            tr.validate(&layout),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn self_loop_is_rejected() {
        let layout = StateLayout::new(1, 3).unwrap();
        let tr = Transition::per_capita(1, 1, per_group(1, 0.5));
        assert!(tr.validate(&layout).is_err());
    }

    #[test]
    fn out_of_range_compartments_are_rejected() {
        let layout = StateLayout::new(1, 3).unwrap();
        assert!(Transition::per_capita(0, 3, per_group(1, 0.5))
            .validate(&layout)
            .is_err());
        let tr = Transition::force_of_infection(
            0,
            1,
            per_group(1, 0.1),
            vec![InfectiousSource {
                compartment: 5,
                infectivity: per_group(1, 1.0),
            }],
        );
        assert!(tr.validate(&layout).is_err());
    }

    #[test]
    fn force_of_infection_needs_sources() {
        let layout = StateLayout::new(1, 3).unwrap();
        let tr = Transition::force_of_infection(0, 1, per_group(1, 0.1), vec![]);
        assert!(tr.validate(&layout).is_err());
    }
}
