//! Sampleable parameter distributions with hard bounds.

use crate::error::{ParamError, ParamResult};
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};

/// Maximum redraws for a truncated normal before the draw is clamped.
const MAX_TRUNCATION_RETRIES: usize = 64;

/// A closed set of distribution variants used for uncertain model parameters.
///
/// The variant set is small and fixed (a matter of model methodology, not an
/// extension point), so it is an enum rather than a trait object: the sampling
/// routine matches exhaustively and serialization stays trivial.
///
/// Every variant guarantees that samples lie within `[lower_bound, upper_bound]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterDistribution {
    /// Continuous uniform on `[lower, upper]`.
    Uniform { lower: f64, upper: f64 },
    /// Uniform over the integers `lower..=upper`, sampled as whole-number f64.
    DiscreteUniform { lower: i64, upper: i64 },
    /// Normal with mean/std_dev, truncated to `[lower, upper]` by resampling.
    Normal {
        mean: f64,
        std_dev: f64,
        lower: f64,
        upper: f64,
    },
}

impl ParameterDistribution {
    /// Continuous uniform distribution. `lower == upper` is a legal degenerate
    /// constant.
    pub fn uniform(lower: f64, upper: f64) -> ParamResult<Self> {
        check_finite(lower, "uniform lower bound")?;
        check_finite(upper, "uniform upper bound")?;
        if lower > upper {
            return Err(ParamError::InvalidRange { lower, upper });
        }
        Ok(Self::Uniform { lower, upper })
    }

    /// Uniform distribution over the integers `lower..=upper`.
    pub fn discrete_uniform(lower: i64, upper: i64) -> ParamResult<Self> {
        if lower > upper {
            return Err(ParamError::InvalidRange {
                lower: lower as f64,
                upper: upper as f64,
            });
        }
        Ok(Self::DiscreteUniform { lower, upper })
    }

    /// Normal distribution truncated to `[lower, upper]`.
    ///
    /// Truncation resamples rather than clamps, so the realized mean is not
    /// silently dragged toward the bounds. A spread with zero-width bounds has
    /// no sample space to resample in and is rejected.
    pub fn normal(lower: f64, upper: f64, mean: f64, std_dev: f64) -> ParamResult<Self> {
        check_finite(lower, "normal lower bound")?;
        check_finite(upper, "normal upper bound")?;
        check_finite(mean, "normal mean")?;
        check_finite(std_dev, "normal std_dev")?;
        if lower > upper {
            return Err(ParamError::InvalidRange { lower, upper });
        }
        if std_dev < 0.0 {
            return Err(ParamError::InvalidArg {
                what: "normal std_dev must be non-negative",
            });
        }
        if lower == upper && std_dev > 0.0 {
            return Err(ParamError::DegenerateSample {
                what: "normal distribution with zero-width bounds and non-zero std_dev",
            });
        }
        Ok(Self::Normal {
            mean,
            std_dev,
            lower,
            upper,
        })
    }

    /// Inclusive lower bound of the sample space.
    pub fn lower_bound(&self) -> f64 {
        match self {
            Self::Uniform { lower, .. } => *lower,
            Self::DiscreteUniform { lower, .. } => *lower as f64,
            Self::Normal { lower, .. } => *lower,
        }
    }

    /// Inclusive upper bound of the sample space.
    pub fn upper_bound(&self) -> f64 {
        match self {
            Self::Uniform { upper, .. } => *upper,
            Self::DiscreteUniform { upper, .. } => *upper as f64,
            Self::Normal { upper, .. } => *upper,
        }
    }

    /// Draw one sample from the caller-supplied random source.
    ///
    /// The result always lies within `[lower_bound, upper_bound]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Uniform { lower, upper } => {
                if lower == upper {
                    *lower
                } else {
                    Uniform::new_inclusive(*lower, *upper).sample(rng)
                }
            }
            Self::DiscreteUniform { lower, upper } => rng.gen_range(*lower..=*upper) as f64,
            Self::Normal {
                mean,
                std_dev,
                lower,
                upper,
            } => {
                if *std_dev == 0.0 {
                    return mean.clamp(*lower, *upper);
                }
                // validated non-negative and finite at construction
                let normal = Normal::new(*mean, *std_dev).expect("std_dev validated");
                for _ in 0..MAX_TRUNCATION_RETRIES {
                    let draw = normal.sample(rng);
                    if (*lower..=*upper).contains(&draw) {
                        return draw;
                    }
                }
                let clamped = mean.clamp(*lower, *upper);
                tracing::warn!(
                    mean, std_dev, lower, upper,
                    "truncated normal exhausted {MAX_TRUNCATION_RETRIES} redraws, clamping to bounds"
                );
                clamped
            }
        }
    }
}

fn check_finite(v: f64, what: &'static str) -> ParamResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NonFinite { what, value: v })
    }
}
