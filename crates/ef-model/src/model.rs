//! The compartmental model: uncertain contact matrix coupled to a pure
//! derivative evaluator.

use crate::error::{ModelError, ModelResult};
use crate::layout::StateLayout;
use crate::population::Population;
use crate::transition::{RateLaw, Transition};
use ef_contact::UncertainContactMatrix;
use ef_core::ensure_finite;
use ef_params::UncertainValue;
use ef_sim::{EnsembleModel, SimResult, TransientModel};
use nalgebra::DVector;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Days per half-year, the period anchor of the seasonal contact modulation.
const HALF_YEAR_DAYS: f64 = 182.5;

/// A compartmental epidemic model over population groups.
///
/// The model owns its structural parameters: the state layout, the uncertain
/// contact matrix (with damping timelines), the transition rules and the
/// seasonality modulation. `derivative` is a pure function of `(state, time)`
/// and these parameters; all sampling happens in `draw_samples` between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompartmentalModel {
    layout: StateLayout,
    contact: UncertainContactMatrix,
    transitions: Vec<Transition>,
    seasonality: UncertainValue,
    start_day: f64,
    initial: Population,
}

impl CompartmentalModel {
    /// Model without transitions; add them with [`Self::add_transition`].
    pub fn new(
        layout: StateLayout,
        contact: UncertainContactMatrix,
        initial: Population,
    ) -> ModelResult<Self> {
        if contact.group().num_groups() != layout.num_groups() {
            return Err(ModelError::DimensionMismatch {
                what: "contact matrix group count does not match layout",
                expected: layout.num_groups(),
                got: contact.group().num_groups(),
            });
        }
        if initial.layout() != layout {
            return Err(ModelError::DimensionMismatch {
                what: "initial population layout does not match model layout",
                expected: layout.len(),
                got: initial.layout().len(),
            });
        }
        Ok(Self {
            layout,
            contact,
            transitions: Vec::new(),
            seasonality: UncertainValue::new(0.0),
            start_day: 0.0,
            initial,
        })
    }

    pub fn layout(&self) -> StateLayout {
        self.layout
    }

    pub fn contact(&self) -> &UncertainContactMatrix {
        &self.contact
    }

    /// Mutable contact access for setup (bounds, dampings).
    pub fn contact_mut(&mut self) -> &mut UncertainContactMatrix {
        &mut self.contact
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Validate and append a transition rule.
    pub fn add_transition(&mut self, transition: Transition) -> ModelResult<()> {
        transition.validate(&self.layout)?;
        self.transitions.push(transition);
        Ok(())
    }

    /// Insert an intervention into every contact channel's damping timeline.
    pub fn add_damping(&mut self, damping: ef_contact::Damping) -> ModelResult<()> {
        self.contact.group_mut().add_damping(damping)?;
        Ok(())
    }

    pub fn seasonality(&self) -> &UncertainValue {
        &self.seasonality
    }

    /// Seasonal contact amplitude in [0, 1]; 0 disables the modulation.
    pub fn set_seasonality(&mut self, seasonality: UncertainValue) -> ModelResult<()> {
        ef_core::ensure_unit_interval(seasonality.value(), "seasonality amplitude")?;
        self.seasonality = seasonality;
        Ok(())
    }

    pub fn start_day(&self) -> f64 {
        self.start_day
    }

    /// Day of year at simulation time 0, anchoring the seasonal cycle.
    pub fn set_start_day(&mut self, start_day: f64) -> ModelResult<()> {
        ensure_finite(start_day, "start day")?;
        self.start_day = start_day;
        Ok(())
    }

    pub fn initial(&self) -> &Population {
        &self.initial
    }

    pub fn set_initial(&mut self, initial: Population) -> ModelResult<()> {
        if initial.layout() != self.layout {
            return Err(ModelError::DimensionMismatch {
                what: "initial population layout does not match model layout",
                expected: self.layout.len(),
                got: initial.layout().len(),
            });
        }
        self.initial = initial;
        Ok(())
    }

    /// Seasonal scaling of contact rates at simulation time `t`: winter peaks
    /// at `1 + k`, summer troughs at `1 - k`.
    pub fn season_factor(&self, t: f64) -> f64 {
        let k = self.seasonality.value();
        1.0 + k * (std::f64::consts::PI * ((self.start_day + t) / HALF_YEAR_DAYS + 0.5)).sin()
    }

    /// Instantaneous rate of change of every compartment in every group.
    ///
    /// Pure in `(state, time)`: resolves the effective contact matrix at
    /// `time`, assembles each transition's per-group flow, and returns the
    /// net inflow minus outflow per compartment. Empty groups contribute zero
    /// force of infection rather than dividing by zero.
    pub fn derivative(&self, state: &DVector<f64>, time: f64) -> ModelResult<DVector<f64>> {
        if state.len() != self.layout.len() {
            return Err(ModelError::DimensionMismatch {
                what: "state vector does not match model layout",
                expected: self.layout.len(),
                got: state.len(),
            });
        }

        let ng = self.layout.num_groups();
        let effective = self.contact.group().at(time) * self.season_factor(time);
        let totals: Vec<f64> = (0..ng).map(|g| self.layout.group_total(state, g)).collect();

        let mut dxdt: DVector<f64> = DVector::zeros(state.len());
        for transition in &self.transitions {
            let source = transition.source;
            let target = transition.target;
            match &transition.rate {
                RateLaw::PerCapita { rates } => {
                    for g in 0..ng {
                        let flow = rates[g].value() * state[self.layout.index(g, source)];
                        dxdt[self.layout.index(g, source)] -= flow;
                        dxdt[self.layout.index(g, target)] += flow;
                    }
                }
                RateLaw::ForceOfInfection {
                    transmission,
                    sources,
                } => {
                    for g in 0..ng {
                        let mut lambda = 0.0;
                        for j in 0..ng {
                            if totals[j] <= 0.0 {
                                continue;
                            }
                            let mut infectious = 0.0;
                            for src in sources {
                                infectious += src.infectivity[j].value()
                                    * state[self.layout.index(j, src.compartment)];
                            }
                            lambda += effective[(g, j)] * infectious / totals[j];
                        }
                        let flow =
                            transmission[g].value() * lambda * state[self.layout.index(g, source)];
                        dxdt[self.layout.index(g, source)] -= flow;
                        dxdt[self.layout.index(g, target)] += flow;
                    }
                }
            }
        }

        for &v in dxdt.iter() {
            if !v.is_finite() {
                return Err(ModelError::NonFinite {
                    what: "compartment derivative",
                    value: v,
                });
            }
        }
        Ok(dxdt)
    }

    /// Re-draw every uncertain parameter: transition rates, transmission
    /// probabilities, infectivities, seasonality, and the contact baseline
    /// realization. Called once per ensemble run, never during integration.
    pub fn draw_samples<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for transition in &mut self.transitions {
            match &mut transition.rate {
                RateLaw::PerCapita { rates } => {
                    for rate in rates {
                        rate.draw_sample(rng);
                    }
                }
                RateLaw::ForceOfInfection {
                    transmission,
                    sources,
                } => {
                    for prob in transmission {
                        prob.draw_sample(rng);
                    }
                    for src in sources {
                        for weight in &mut src.infectivity {
                            weight.draw_sample(rng);
                        }
                    }
                }
            }
        }
        self.seasonality.draw_sample(rng);
        self.contact.draw_sample(rng);
    }
}

impl TransientModel for CompartmentalModel {
    fn dim(&self) -> usize {
        self.layout.len()
    }

    fn initial_state(&self) -> DVector<f64> {
        self.initial.as_vector().clone()
    }

    fn rhs(&self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
        Ok(self.derivative(x, t)?)
    }
}

impl EnsembleModel for CompartmentalModel {
    fn draw_samples<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        CompartmentalModel::draw_samples(self, rng);
    }
}
