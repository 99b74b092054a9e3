use std::fmt;

use ndarray::{ArrayD, ArrayViewD, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// How a shock scenario is expressed relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComparisonKind {
    /// scenario / baseline
    #[serde(rename = "rel")]
    Relative,
    /// scenario - baseline
    #[serde(rename = "dif")]
    Difference,
    /// (scenario - baseline) / baseline
    #[serde(rename = "dif_rel")]
    RelativeDifference,
}

impl ComparisonKind {
    pub const ALL: [ComparisonKind; 3] = [
        ComparisonKind::Relative,
        ComparisonKind::Difference,
        ComparisonKind::RelativeDifference,
    ];

    /// Apply to a single pair. A zero baseline makes the ratios 0.
    pub fn apply(self, scenario: f64, base: f64) -> f64 {
        match self {
            ComparisonKind::Difference => scenario - base,
            ComparisonKind::Relative if base != 0.0 => scenario / base,
            ComparisonKind::RelativeDifference if base != 0.0 => (scenario - base) / base,
            _ => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonKind::Relative => "rel",
            ComparisonKind::Difference => "dif",
            ComparisonKind::RelativeDifference => "dif_rel",
        }
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element-wise comparison of two equally shaped arrays.
pub fn compare(
    kind: ComparisonKind,
    scenario: ArrayViewD<'_, f64>,
    base: ArrayViewD<'_, f64>,
) -> Result<ArrayD<f64>> {
    if scenario.shape() != base.shape() {
        return Err(AnalysisError::shape(format!(
            "scenario shape {:?} differs from baseline shape {:?}",
            scenario.shape(),
            base.shape()
        )));
    }
    Ok(Zip::from(&scenario)
        .and(&base)
        .map_collect(|&s, &b| kind.apply(s, b)))
}

// ---------------------------------------------------------------------------
// Value ranges shared across scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Range symmetric around zero that covers every value of every array.
///
/// Both ends start at zero, so an empty input gives `(0, 0)`. NaNs are ignored.
pub fn symmetric_range<'a, I>(arrays: I) -> ValueRange
where
    I: IntoIterator<Item = &'a ArrayD<f64>>,
{
    let (min, max) = arrays
        .into_iter()
        .flat_map(|a| a.iter().copied())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let bound = min.abs().max(max.abs());
    ValueRange {
        min: -bound,
        max: bound,
    }
}
