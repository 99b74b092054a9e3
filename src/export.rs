//! Flat, labelled records for the presentation layer.

use std::io;

use ndarray::{ArrayD, Dimension};
use serde::Serialize;

use crate::config::Dimensions;
use crate::data::compare::ComparisonKind;
use crate::data::summary::ExperimentSummary;
use crate::error::{AnalysisError, Result};

/// Labels for the axes of an array with the experiment axis already removed:
/// `(time[, country[, sector]])`.
#[derive(Debug, Clone, Copy)]
pub struct AxisLabels<'a> {
    pub time: &'a [String],
    pub countries: &'a [String],
    pub sectors: Option<&'a [String]>,
}

impl<'a> AxisLabels<'a> {
    /// Country-level labels from [`Dimensions`].
    pub fn countries(dims: &'a Dimensions) -> Self {
        AxisLabels {
            time: &dims.time,
            countries: &dims.countries,
            sectors: None,
        }
    }

    /// Country-level labels plus a sector axis.
    pub fn with_sectors(self, sectors: &'a [String]) -> Self {
        AxisLabels {
            sectors: Some(sectors),
            ..self
        }
    }

    fn check(&self, shape: &[usize]) -> Result<()> {
        let axes: [Option<&[String]>; 3] = [Some(self.time), Some(self.countries), self.sectors];
        if shape.is_empty() || shape.len() > axes.len() {
            return Err(AnalysisError::shape(format!(
                "cannot label an array of shape {shape:?}"
            )));
        }
        for (axis, (&len, labels)) in shape.iter().zip(axes).enumerate() {
            match labels {
                Some(labels) if labels.len() == len => {}
                Some(labels) => {
                    return Err(AnalysisError::shape(format!(
                        "axis {axis} has {len} entries but {} labels",
                        labels.len()
                    )))
                }
                None => {
                    return Err(AnalysisError::shape(format!(
                        "no labels for axis {axis} of shape {shape:?}"
                    )))
                }
            }
        }
        Ok(())
    }

    fn label(&self, ix: &[usize]) -> (&'a str, Option<&'a str>, Option<&'a str>) {
        (
            self.time[ix[0]].as_str(),
            ix.get(1).map(|&c| self.countries[c].as_str()),
            ix.get(2)
                .and_then(|&s| self.sectors.map(|labels| labels[s].as_str())),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord<'a> {
    pub scenario: &'a str,
    pub variable: &'a str,
    pub time: &'a str,
    pub country: Option<&'a str>,
    pub sector: Option<&'a str>,
    pub mean: f64,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord<'a> {
    pub scenario: &'a str,
    pub variable: &'a str,
    pub kind: &'static str,
    pub time: &'a str,
    pub country: Option<&'a str>,
    pub sector: Option<&'a str>,
    pub value: f64,
}

/// One record per coordinate of a summary, in row-major order.
pub fn summary_records<'a>(
    scenario: &'a str,
    variable: &'a str,
    summary: &ExperimentSummary,
    labels: AxisLabels<'a>,
) -> Result<Vec<SummaryRecord<'a>>> {
    labels.check(summary.mean.shape())?;
    Ok(summary
        .mean
        .indexed_iter()
        .map(|(ix, &mean)| {
            let (time, country, sector) = labels.label(ix.slice());
            SummaryRecord {
                scenario,
                variable,
                time,
                country,
                sector,
                mean,
                low: summary.low[&ix],
                high: summary.high[&ix],
            }
        })
        .collect())
}

/// One record per coordinate of a comparison array, in row-major order.
pub fn comparison_records<'a>(
    scenario: &'a str,
    variable: &'a str,
    kind: ComparisonKind,
    values: &ArrayD<f64>,
    labels: AxisLabels<'a>,
) -> Result<Vec<ComparisonRecord<'a>>> {
    labels.check(values.shape())?;
    Ok(values
        .indexed_iter()
        .map(|(ix, &value)| {
            let (time, country, sector) = labels.label(ix.slice());
            ComparisonRecord {
                scenario,
                variable,
                kind: kind.as_str(),
                time,
                country,
                sector,
                value,
            }
        })
        .collect())
}

/// Write records as CSV with a header row.
pub fn write_csv<W: io::Write, R: Serialize>(writer: W, records: &[R]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::summary::PercentileBand;
    use ndarray::IxDyn;

    fn labels(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn comparison_records_are_labelled() {
        let time = labels(&["Q0", "Q1"]);
        let countries = labels(&["AT", "DE"]);
        let sectors = labels(&["A", "B"]);
        let values = ArrayD::from_shape_fn(IxDyn(&[2, 2, 2]), |ix| {
            (ix[0] * 4 + ix[1] * 2 + ix[2]) as f64
        });
        let axes = AxisLabels {
            time: &time,
            countries: &countries,
            sectors: None,
        }
        .with_sectors(&sectors);

        let records = comparison_records(
            "flood",
            "real_sector_output_mean_nace1",
            ComparisonKind::RelativeDifference,
            &values,
            axes,
        )
        .unwrap();

        assert_eq!(records.len(), 8);
        assert_eq!(records[5].time, "Q1");
        assert_eq!(records[5].country, Some("AT"));
        assert_eq!(records[5].sector, Some("B"));
        assert_eq!(records[5].value, 5.0);
        assert_eq!(records[5].kind, "dif_rel");
    }

    #[test]
    fn label_count_must_match_extent() {
        let time = labels(&["Q0"]);
        let countries = labels(&["AT"]);
        let axes = AxisLabels {
            time: &time,
            countries: &countries,
            sectors: None,
        };
        let values = ArrayD::zeros(IxDyn(&[1, 2]));
        let err =
            comparison_records("x", "y", ComparisonKind::Difference, &values, axes).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidShape(_)));

        // a sector axis without sector labels
        let values = ArrayD::zeros(IxDyn(&[1, 1, 3]));
        assert!(comparison_records("x", "y", ComparisonKind::Difference, &values, axes).is_err());
    }

    #[test]
    fn summary_csv_has_header_and_rows() {
        let time = labels(&["Q0", "Q1"]);
        let countries = labels(&["AT"]);
        let summary = ExperimentSummary {
            mean: ArrayD::from_shape_vec(IxDyn(&[2, 1]), vec![1.0, 2.0]).unwrap(),
            low: ArrayD::from_shape_vec(IxDyn(&[2, 1]), vec![0.5, 1.5]).unwrap(),
            high: ArrayD::from_shape_vec(IxDyn(&[2, 1]), vec![1.5, 2.5]).unwrap(),
            band: PercentileBand::default(),
        };
        let axes = AxisLabels {
            time: &time,
            countries: &countries,
            sectors: None,
        };
        let records = summary_records("baseline", "real_output", &summary, axes).unwrap();

        let mut buf = Vec::new();
        write_csv(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "scenario,variable,time,country,sector,mean,low,high");
        assert_eq!(lines[1], "baseline,real_output,Q0,AT,,1.0,0.5,1.5");
        assert_eq!(lines[2], "baseline,real_output,Q1,AT,,2.0,1.5,2.5");
        assert_eq!(lines.len(), 3);
    }
}
