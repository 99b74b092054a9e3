use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Zip};
use serde::{Deserialize, Serialize};

use super::model::{AggregatedSeries, RawSeries};
use super::sectors::SectorMap;
use crate::error::{AnalysisError, Result};

/// How the fine sectors of one coarse sector are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    #[default]
    Sum,
    /// Sum divided by the number of fine sectors in the bucket.
    Mean,
}

/// Collapse the trailing (sector) axis of `input` from fine to coarse sectors.
///
/// Any number of leading axes is accepted, so raw `(time, experiment,
/// country, sector)` arrays and experiment means `(time, country, sector)`
/// go through the same path. Each lane along the sector axis is visited once
/// and every value is added into its bucket, so the cost is linear in the
/// number of input elements. Buckets start at zero; a coarse sector without
/// members stays zero.
pub fn aggregate_array(
    input: ArrayViewD<'_, f64>,
    map: &SectorMap,
    reduction: Reduction,
) -> Result<ArrayD<f64>> {
    let ndim = input.ndim();
    if ndim == 0 {
        return Err(AnalysisError::shape("cannot aggregate a 0-dimensional array"));
    }
    let sector_axis = Axis(ndim - 1);
    let fine = input.len_of(sector_axis);
    if fine != map.fine_len() {
        return Err(AnalysisError::shape(format!(
            "sector axis of shape {:?} has {fine} entries, sector map expects {}",
            input.shape(),
            map.fine_len()
        )));
    }

    let mut out_shape = input.shape().to_vec();
    out_shape[ndim - 1] = map.coarse_len();
    let mut output = ArrayD::<f64>::zeros(IxDyn(&out_shape));

    let buckets = map.buckets();
    Zip::from(output.lanes_mut(sector_axis))
        .and(input.lanes(sector_axis))
        .for_each(|mut coarse, fine| {
            for (&value, &bucket) in fine.iter().zip(buckets) {
                coarse[bucket] += value;
            }
        });

    if reduction == Reduction::Mean {
        let sizes = map.bucket_sizes();
        for mut coarse in output.lanes_mut(sector_axis) {
            for (value, &n) in coarse.iter_mut().zip(sizes) {
                if n > 0 {
                    *value /= n as f64;
                }
            }
        }
    }

    Ok(output)
}

/// [`aggregate_array`] for a [`RawSeries`], keeping the coarse labels alongside.
pub fn aggregate(raw: &RawSeries, map: &SectorMap, reduction: Reduction) -> Result<AggregatedSeries> {
    Ok(AggregatedSeries {
        values: aggregate_array(raw.view(), map, reduction)?,
        sector_labels: map.coarse_labels_arc(),
    })
}
