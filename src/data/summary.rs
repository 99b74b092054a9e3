use ndarray::{ArrayD, ArrayViewD, Axis, Zip};
use serde::{Deserialize, Serialize};

use super::model::EXPERIMENT_AXIS;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// PercentileBand
// ---------------------------------------------------------------------------

/// Low/high percentiles (0–100) bracketing the experiment spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub low: f64,
    pub high: f64,
}

impl PercentileBand {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let band = PercentileBand { low, high };
        band.validate()?;
        Ok(band)
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if in_range(self.low) && in_range(self.high) && self.low <= self.high {
            Ok(())
        } else {
            Err(AnalysisError::InvalidPercentile {
                low: self.low,
                high: self.high,
            })
        }
    }
}

impl Default for PercentileBand {
    fn default() -> Self {
        PercentileBand {
            low: 5.0,
            high: 95.0,
        }
    }
}

/// Percentile `q` (0–100) of ascending `sorted`, interpolating linearly
/// between neighbouring order statistics.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q / 100.0 * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

// ---------------------------------------------------------------------------
// Summarizer
// ---------------------------------------------------------------------------

/// Mean and percentile band of a variable across experiments.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentSummary {
    pub mean: ArrayD<f64>,
    pub low: ArrayD<f64>,
    pub high: ArrayD<f64>,
    pub band: PercentileBand,
}

/// Collapses the experiment axis of model output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summarizer {
    band: PercentileBand,
}

impl Summarizer {
    pub fn new(band: PercentileBand) -> Result<Self> {
        band.validate()?;
        Ok(Summarizer { band })
    }

    pub fn band(&self) -> PercentileBand {
        self.band
    }

    /// Summarize `values` over axis 1. The result has that axis removed.
    pub fn summarize(&self, values: ArrayViewD<'_, f64>) -> Result<ExperimentSummary> {
        let mean = experiment_mean(values.view())?;
        let axis = Axis(EXPERIMENT_AXIS);

        let mut low = ArrayD::<f64>::zeros(mean.raw_dim());
        let mut high = ArrayD::<f64>::zeros(mean.raw_dim());
        let mut scratch = Vec::with_capacity(values.len_of(axis));
        let band = self.band;

        Zip::from(&mut low)
            .and(&mut high)
            .and(values.lanes(axis))
            .for_each(|lo, hi, lane| {
                scratch.clear();
                scratch.extend(lane.iter().copied());
                scratch.sort_by(f64::total_cmp);
                *lo = percentile_sorted(&scratch, band.low);
                *hi = percentile_sorted(&scratch, band.high);
            });

        Ok(ExperimentSummary {
            mean,
            low,
            high,
            band,
        })
    }
}

/// Mean over the experiment axis (axis 1), which is removed from the result.
pub fn experiment_mean(values: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>> {
    if values.ndim() <= EXPERIMENT_AXIS {
        return Err(AnalysisError::shape(format!(
            "shape {:?} has no experiment axis",
            values.shape()
        )));
    }
    values.mean_axis(Axis(EXPERIMENT_AXIS)).ok_or_else(|| {
        AnalysisError::shape(format!("shape {:?} has no experiments", values.shape()))
    })
}
