//! Damping events: time-indexed contact reductions from interventions.

use crate::error::{ContactError, ContactResult};
use ef_core::{ensure_finite, ensure_unit_interval};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a damping event combines with other simultaneously active events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DampingKind {
    /// Replaces the previous overriding event on the same level; only the most
    /// recent one per level contributes (e.g. the current lockdown stage).
    Overriding,
    /// Adds on top of whatever else is active (e.g. a local mask mandate).
    Cumulative,
}

/// A single intervention event: from `time` onward, contact between group
/// pairs is reduced by the per-pair factors in `coeffs` (0 = no reduction,
/// 1 = full suppression).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Damping {
    time: f64,
    kind: DampingKind,
    level: u32,
    coeffs: DMatrix<f64>,
}

impl Damping {
    /// Damping with per-group-pair reduction factors.
    ///
    /// `coeffs` must be square with every entry in [0, 1].
    pub fn new(time: f64, kind: DampingKind, level: u32, coeffs: DMatrix<f64>) -> ContactResult<Self> {
        ensure_finite(time, "damping time")?;
        if coeffs.nrows() != coeffs.ncols() {
            return Err(ContactError::DimensionMismatch {
                what: "damping coefficient matrix must be square",
                expected: coeffs.nrows(),
                got: coeffs.ncols(),
            });
        }
        if coeffs.is_empty() {
            return Err(ContactError::InvalidArg {
                what: "damping coefficient matrix must be non-empty",
            });
        }
        for &v in coeffs.iter() {
            ensure_unit_interval(v, "damping coefficient")?;
        }
        Ok(Self {
            time,
            kind,
            level,
            coeffs,
        })
    }

    /// Damping that reduces every group pair by the same factor.
    pub fn constant(
        num_groups: usize,
        value: f64,
        time: f64,
        kind: DampingKind,
        level: u32,
    ) -> ContactResult<Self> {
        if num_groups == 0 {
            return Err(ContactError::InvalidArg {
                what: "num_groups must be at least 1",
            });
        }
        Self::new(time, kind, level, DMatrix::from_element(num_groups, num_groups, value))
    }

    /// Simulation time from which this event is active.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn kind(&self) -> DampingKind {
        self.kind
    }

    /// Intervention level; overriding events replace each other per level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Per-group-pair reduction factors in [0, 1].
    pub fn coeffs(&self) -> &DMatrix<f64> {
        &self.coeffs
    }

    /// Group dimension of the coefficient matrix.
    pub fn num_groups(&self) -> usize {
        self.coeffs.nrows()
    }
}

/// The ordered damping timeline of one contact matrix.
///
/// Events stay sorted ascending by time (stably, so insertion order breaks
/// exact ties). Each insertion invalidates and rebuilds the resolved
/// piecewise-constant active factors, so queries are a binary search and never
/// mutate — safe to call at arbitrary, also decreasing, times.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DampingsData", into = "DampingsData")]
pub struct Dampings {
    num_groups: usize,
    events: Vec<Damping>,
    segments: Vec<Segment>,
}

/// Active damping factors from `time` until the next segment.
#[derive(Debug, Clone)]
struct Segment {
    time: f64,
    factors: DMatrix<f64>,
}

impl Dampings {
    /// Empty timeline for matrices of the given group dimension.
    pub fn new(num_groups: usize) -> Self {
        Self {
            num_groups,
            events: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Events sorted ascending by time.
    pub fn events(&self) -> &[Damping] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Insert an event and rebuild the resolved active factors.
    pub fn add(&mut self, damping: Damping) -> ContactResult<()> {
        if damping.num_groups() != self.num_groups {
            return Err(ContactError::DimensionMismatch {
                what: "damping dimension does not match contact matrix",
                expected: self.num_groups,
                got: damping.num_groups(),
            });
        }
        self.events.push(damping);
        // stable: events at the same time keep their insertion order
        self.events.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.rebuild();
        Ok(())
    }

    /// The active damping factors at `time`.
    ///
    /// Combination policy: per level, the most recent overriding event with
    /// `event time <= time` supplies the base factor (ties go to the
    /// later-inserted event); all cumulative events up to `time` add on top;
    /// the element-wise total is clamped to [0, 1]. With no active event the
    /// result is all zeros — full baseline contact.
    pub fn active_at(&self, time: f64) -> DMatrix<f64> {
        let idx = self.segments.partition_point(|s| s.time <= time);
        if idx == 0 {
            DMatrix::zeros(self.num_groups, self.num_groups)
        } else {
            self.segments[idx - 1].factors.clone()
        }
    }

    fn rebuild(&mut self) {
        self.segments.clear();
        let n = self.num_groups;
        let mut overriding: BTreeMap<u32, DMatrix<f64>> = BTreeMap::new();
        let mut cumulative = DMatrix::zeros(n, n);

        let mut i = 0;
        while i < self.events.len() {
            let t = self.events[i].time;
            // fold in the whole batch of events at this exact time; within the
            // batch the later-inserted overriding event overwrites its level
            while i < self.events.len() && self.events[i].time == t {
                let ev = &self.events[i];
                match ev.kind {
                    DampingKind::Overriding => {
                        overriding.insert(ev.level, ev.coeffs.clone());
                    }
                    DampingKind::Cumulative => {
                        cumulative += &ev.coeffs;
                    }
                }
                i += 1;
            }
            let mut factors = cumulative.clone();
            for coeffs in overriding.values() {
                factors += coeffs;
            }
            factors.apply(|v| *v = v.clamp(0.0, 1.0));
            self.segments.push(Segment { time: t, factors });
        }
    }
}

impl PartialEq for Dampings {
    fn eq(&self, other: &Self) -> bool {
        self.num_groups == other.num_groups && self.events == other.events
    }
}

/// Persistence form: the event list only; resolution state is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct DampingsData {
    num_groups: usize,
    events: Vec<Damping>,
}

impl TryFrom<DampingsData> for Dampings {
    type Error = ContactError;

    fn try_from(data: DampingsData) -> ContactResult<Self> {
        let mut dampings = Dampings::new(data.num_groups);
        for event in data.events {
            dampings.add(event)?;
        }
        Ok(dampings)
    }
}

impl From<Dampings> for DampingsData {
    fn from(dampings: Dampings) -> Self {
        Self {
            num_groups: dampings.num_groups,
            events: dampings.events,
        }
    }
}
