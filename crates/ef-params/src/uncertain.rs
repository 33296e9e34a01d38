//! A scalar parameter with an optional attached uncertainty distribution.

use crate::distribution::ParameterDistribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A scalar that carries its current deterministic value together with an
/// optional owned [`ParameterDistribution`].
///
/// The two parts are independently settable: constructing from a plain scalar
/// leaves the distribution absent. Cloning deep-copies the distribution, so no
/// two parameters ever share sampling configuration.
///
/// Comparison operators look at the current value only; the distribution never
/// participates. This lets uncertain parameters compare directly against plain
/// scalars in rate arithmetic and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UncertainValue {
    value: f64,
    distribution: Option<ParameterDistribution>,
}

impl UncertainValue {
    /// A certain value with no attached distribution.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            distribution: None,
        }
    }

    /// A value with an attached distribution. The current value is left as
    /// given until the first `draw_sample`.
    pub fn with_distribution(value: f64, distribution: ParameterDistribution) -> Self {
        Self {
            value,
            distribution: Some(distribution),
        }
    }

    /// Side-effect-free read of the current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Overwrite the current value; the distribution is untouched.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Attach (or replace) the distribution; the current value is untouched.
    pub fn set_distribution(&mut self, distribution: ParameterDistribution) {
        self.distribution = Some(distribution);
    }

    /// Detach and return the distribution, making the value certain again.
    pub fn remove_distribution(&mut self) -> Option<ParameterDistribution> {
        self.distribution.take()
    }

    pub fn distribution(&self) -> Option<&ParameterDistribution> {
        self.distribution.as_ref()
    }

    /// Whether a distribution is attached. A parameter without one is a
    /// deliberate, observable state: `draw_sample` will leave it unchanged.
    pub fn has_distribution(&self) -> bool {
        self.distribution.is_some()
    }

    /// Sample a new current value from the attached distribution.
    ///
    /// Without a distribution this is an explicit no-op that returns the
    /// current value unchanged — check `has_distribution` when a configuration
    /// is required to be uncertain.
    pub fn draw_sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        if let Some(dist) = &self.distribution {
            self.value = dist.sample(rng);
        }
        self.value
    }
}

impl From<f64> for UncertainValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl PartialEq for UncertainValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for UncertainValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl PartialEq<f64> for UncertainValue {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl PartialOrd<f64> for UncertainValue {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.value.partial_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn plain_scalar_has_no_distribution() {
        let v = UncertainValue::new(4.2);
        assert!(!v.has_distribution());
        assert_eq!(v.value(), 4.2);
    }

    #[test]
    fn draw_without_distribution_is_a_no_op() {
        let mut v = UncertainValue::new(4.2);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(v.draw_sample(&mut rng), 4.2);
        assert_eq!(v.value(), 4.2);
    }

    #[test]
    fn draw_overwrites_value_within_bounds() {
        let dist = ParameterDistribution::uniform(1.0, 2.0).unwrap();
        let mut v = UncertainValue::with_distribution(0.0, dist);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let drawn = v.draw_sample(&mut rng);
            assert_eq!(drawn, v.value());
            assert!((1.0..=2.0).contains(&drawn));
        }
    }

    #[test]
    fn set_value_keeps_distribution() {
        let dist = ParameterDistribution::uniform(0.0, 1.0).unwrap();
        let mut v = UncertainValue::with_distribution(0.5, dist);
        v.set_value(7.0);
        assert_eq!(v.value(), 7.0);
        assert!(v.has_distribution());
    }

    #[test]
    fn clone_deep_copies_distribution() {
        let dist = ParameterDistribution::uniform(0.0, 1.0).unwrap();
        let original = UncertainValue::with_distribution(0.5, dist);
        let mut copy = original.clone();
        copy.remove_distribution();
        assert!(original.has_distribution());
        assert!(!copy.has_distribution());
    }

    #[test]
    fn comparison_ignores_distribution() {
        let dist = ParameterDistribution::uniform(0.0, 100.0).unwrap();
        let a = UncertainValue::with_distribution(1.5, dist);
        let b = UncertainValue::new(1.5);
        assert_eq!(a, b);
        assert_eq!(a, 1.5);
        assert!(a < 2.0);
        assert!(UncertainValue::new(1.0) < b);
    }
}
