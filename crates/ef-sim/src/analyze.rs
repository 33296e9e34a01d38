//! Ensemble statistics on a shared time grid.

use crate::error::{SimError, SimResult};
use crate::sim::SimRecord;
use nalgebra::DVector;

/// Element-wise mean trajectory across ensemble members.
pub fn ensemble_mean(results: &[SimRecord]) -> SimResult<SimRecord> {
    check_grid(results)?;
    let template = &results[0];
    let n = results.len() as f64;

    let x = (0..template.len())
        .map(|k| {
            let mut sum = DVector::zeros(template.x[k].len());
            for record in results {
                sum += &record.x[k];
            }
            sum / n
        })
        .collect();

    Ok(SimRecord {
        t: template.t.clone(),
        x,
    })
}

/// Element-wise p-quantile trajectory across ensemble members.
///
/// For each time point and state element, member values are sorted and the
/// value at rank `floor(num_members * p)` is taken, matching the usual
/// ensemble-percentile convention for epidemic forecasts.
pub fn ensemble_percentile(results: &[SimRecord], p: f64) -> SimResult<SimRecord> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SimError::InvalidArg {
            what: "percentile must lie in [0, 1]",
        });
    }
    check_grid(results)?;
    let template = &results[0];
    let rank = (((results.len() as f64) * p) as usize).min(results.len() - 1);

    let x = (0..template.len())
        .map(|k| {
            let dim = template.x[k].len();
            DVector::from_fn(dim, |e, _| {
                let mut values: Vec<f64> = results.iter().map(|r| r.x[k][e]).collect();
                values.sort_by(f64::total_cmp);
                values[rank]
            })
        })
        .collect();

    Ok(SimRecord {
        t: template.t.clone(),
        x,
    })
}

fn check_grid(results: &[SimRecord]) -> SimResult<()> {
    let Some(first) = results.first() else {
        return Err(SimError::InvalidArg {
            what: "ensemble statistics need at least one member",
        });
    };
    if first.is_empty() {
        return Err(SimError::InvalidArg {
            what: "ensemble members must contain at least one time point",
        });
    }
    for record in results {
        if record.t != first.t {
            return Err(SimError::InvalidArg {
                what: "ensemble members disagree on the time grid",
            });
        }
    }
    Ok(())
}
