//! Simulation runner and result recording.

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;
use nalgebra::DVector;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
}

/// Options for simulation runs. Time is measured in simulated days.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Start time (days)
    pub t0: f64,
    /// Fixed time step (days)
    pub dt: f64,
    /// Final simulation time (days)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            t0: 0.0,
            dt: 0.1,
            t_end: 50.0,
            max_steps: 100_000,
            record_every: 10,
            integrator: IntegratorType::default(),
        }
    }
}

/// Recorded trajectory of one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimRecord {
    /// Time points (days)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<DVector<f64>>,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// The last recorded state (every run records at least the initial state).
    pub fn last_state(&self) -> Option<&DVector<f64>> {
        self.x.last()
    }
}

/// Run one transient simulation with a fixed-step integrator.
pub fn run_sim<M: TransientModel>(model: &M, opts: &SimOptions) -> SimResult<SimRecord> {
    if opts.dt <= 0.0 || !opts.dt.is_finite() {
        return Err(SimError::InvalidArg {
            what: "dt must be positive and finite",
        });
    }
    if !opts.t0.is_finite() || opts.t_end < opts.t0 {
        return Err(SimError::InvalidArg {
            what: "t_end must not precede t0",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let mut t = opts.t0;
    let mut x = model.initial_state();

    tracing::debug!(t0 = opts.t0, t_end = opts.t_end, dt = opts.dt, "starting run");

    let mut t_record = vec![t];
    let mut x_record = vec![x.clone()];

    let mut step = 0;
    while t < opts.t_end && step < opts.max_steps {
        x = match opts.integrator {
            IntegratorType::RK4 => RK4.step(model, t, &x, opts.dt)?,
            IntegratorType::ForwardEuler => ForwardEuler.step(model, t, &x, opts.dt)?,
        };
        t += opts.dt;
        step += 1;

        if step % opts.record_every == 0 {
            t_record.push(t);
            x_record.push(x.clone());
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        t_record.push(t);
        x_record.push(x);
    }

    tracing::debug!(steps = step, points = t_record.len(), "run finished");

    Ok(SimRecord {
        t: t_record,
        x: x_record,
    })
}
