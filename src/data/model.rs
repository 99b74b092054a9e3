use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ndarray::{ArrayD, ArrayViewD};

use crate::error::{AnalysisError, Result};

/// Axis positions shared by every model output array.
pub const TIME_AXIS: usize = 0;
pub const EXPERIMENT_AXIS: usize = 1;
pub const COUNTRY_AXIS: usize = 2;

// ---------------------------------------------------------------------------
// MatValue – one decoded MAT variable, before normalization
// ---------------------------------------------------------------------------

/// A variable as a MAT reader hands it over, typed by its MATLAB class.
#[derive(Debug, Clone, PartialEq)]
pub enum MatValue {
    Double(ArrayD<f64>),
    Single(ArrayD<f32>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
    Logical(ArrayD<bool>),
    /// Header strings and char arrays.
    Text(String),
}

impl MatValue {
    /// MATLAB class name, for log messages.
    pub fn class_name(&self) -> &'static str {
        match self {
            MatValue::Double(_) => "double",
            MatValue::Single(_) => "single",
            MatValue::Int32(_) => "int32",
            MatValue::Int64(_) => "int64",
            MatValue::UInt8(_) => "uint8",
            MatValue::Logical(_) => "logical",
            MatValue::Text(_) => "char",
        }
    }

    /// Convert any numeric class to `f64`. Text has no numeric form.
    pub fn into_f64(self) -> Option<ArrayD<f64>> {
        match self {
            MatValue::Double(a) => Some(a),
            MatValue::Single(a) => Some(a.mapv(f64::from)),
            MatValue::Int32(a) => Some(a.mapv(f64::from)),
            MatValue::Int64(a) => Some(a.mapv(|v| v as f64)),
            MatValue::UInt8(a) => Some(a.mapv(f64::from)),
            MatValue::Logical(a) => Some(a.mapv(|v| if v { 1.0 } else { 0.0 })),
            MatValue::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RawSeries – one model variable of one scenario
// ---------------------------------------------------------------------------

/// Model output for one variable: `(time, experiment, country[, sector])`,
/// or `(time, experiment)` for euro-area wide variables.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    values: ArrayD<f64>,
}

impl RawSeries {
    pub fn new(values: ArrayD<f64>) -> Result<Self> {
        if !(2..=4).contains(&values.ndim()) {
            return Err(AnalysisError::shape(format!(
                "expected 2 to 4 axes, got shape {:?}",
                values.shape()
            )));
        }
        Ok(RawSeries { values })
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn view(&self) -> ArrayViewD<'_, f64> {
        self.values.view()
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn into_values(self) -> ArrayD<f64> {
        self.values
    }
}

// ---------------------------------------------------------------------------
// AggregatedSeries – a series after the fine → coarse sector reduction
// ---------------------------------------------------------------------------

/// Sector-aggregated array together with the labels of its trailing axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    pub values: ArrayD<f64>,
    pub sector_labels: Arc<[String]>,
}

impl AggregatedSeries {
    /// Values of one coarse sector, looked up by label.
    pub fn sector(&self, label: &str) -> Option<ArrayViewD<'_, f64>> {
        let idx = self.sector_labels.iter().position(|l| l == label)?;
        let axis = ndarray::Axis(self.values.ndim() - 1);
        Some(self.values.index_axis(axis, idx))
    }
}

// ---------------------------------------------------------------------------
// Scenario – all variables of one simulation file
// ---------------------------------------------------------------------------

/// Extents shared by all variables of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extents {
    pub time_steps: usize,
    pub experiments: usize,
    /// `None` while only country-less variables have been seen.
    pub countries: Option<usize>,
}

/// Positional description of one variable, for debug output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    pub shape: Vec<usize>,
    pub axes: Vec<&'static str>,
}

impl fmt::Display for VariableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?} ({})", self.name, self.shape, self.axes.join(", "))
    }
}

/// One loaded scenario (baseline or shock run).
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub variables: BTreeMap<String, RawSeries>,
    pub extents: Option<Extents>,
}

impl Scenario {
    /// Build a scenario, checking that every variable agrees on the shared extents.
    pub fn from_series(name: &str, variables: BTreeMap<String, RawSeries>) -> Result<Self> {
        let mut extents: Option<Extents> = None;

        for (var, series) in &variables {
            let shape = series.shape();
            let countries = shape.get(COUNTRY_AXIS).copied();
            match &mut extents {
                None => {
                    extents = Some(Extents {
                        time_steps: shape[TIME_AXIS],
                        experiments: shape[EXPERIMENT_AXIS],
                        countries,
                    });
                }
                Some(ext) => {
                    if shape[TIME_AXIS] != ext.time_steps
                        || shape[EXPERIMENT_AXIS] != ext.experiments
                    {
                        return Err(AnalysisError::shape(format!(
                            "{name}/{var}: shape {shape:?} disagrees with \
                             {} time steps x {} experiments",
                            ext.time_steps, ext.experiments
                        )));
                    }
                    match (ext.countries, countries) {
                        (Some(expected), Some(got)) if expected != got => {
                            return Err(AnalysisError::shape(format!(
                                "{name}/{var}: {got} countries, expected {expected}"
                            )));
                        }
                        (None, Some(got)) => ext.countries = Some(got),
                        _ => {}
                    }
                }
            }
        }

        Ok(Scenario {
            name: name.to_string(),
            variables,
            extents,
        })
    }

    pub fn get(&self, variable: &str) -> Result<&RawSeries> {
        self.variables
            .get(variable)
            .ok_or_else(|| AnalysisError::MissingVariable(format!("{}/{variable}", self.name)))
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.variables.contains_key(variable)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Name each variable's axes by position.
    pub fn describe(&self) -> Vec<VariableInfo> {
        const AXES: [&str; 4] = ["time", "experiment", "country", "sector"];
        self.variables
            .iter()
            .map(|(name, series)| VariableInfo {
                name: name.clone(),
                shape: series.shape().to_vec(),
                axes: AXES[..series.shape().len()].to_vec(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn series(shape: &[usize]) -> RawSeries {
        RawSeries::new(ArrayD::zeros(IxDyn(shape))).unwrap()
    }

    #[test]
    fn raw_series_rejects_vectors_and_5d() {
        assert!(RawSeries::new(ArrayD::zeros(IxDyn(&[3]))).is_err());
        assert!(RawSeries::new(ArrayD::zeros(IxDyn(&[1, 1, 1, 1, 1]))).is_err());
    }

    #[test]
    fn mat_values_normalize_to_f64() {
        let single = MatValue::Single(ArrayD::from_elem(IxDyn(&[2, 2]), 1.5f32));
        assert_eq!(single.into_f64().unwrap()[[1, 1]], 1.5);

        let logical = MatValue::Logical(ArrayD::from_shape_vec(IxDyn(&[2]), vec![true, false]).unwrap());
        assert_eq!(logical.into_f64().unwrap().as_slice().unwrap(), &[1.0, 0.0]);

        assert!(MatValue::Text("MATLAB 5.0".into()).into_f64().is_none());
    }

    #[test]
    fn scenario_extents_follow_first_variable() {
        let mut vars = BTreeMap::new();
        vars.insert("euribor".to_string(), series(&[13, 4]));
        vars.insert("real_output".to_string(), series(&[13, 4, 26]));
        vars.insert("real_sector_output".to_string(), series(&[13, 4, 26, 62]));

        let sc = Scenario::from_series("baseline", vars).unwrap();
        assert_eq!(
            sc.extents,
            Some(Extents {
                time_steps: 13,
                experiments: 4,
                countries: Some(26)
            })
        );
        assert_eq!(sc.len(), 3);
    }

    #[test]
    fn scenario_rejects_mismatched_countries() {
        let mut vars = BTreeMap::new();
        vars.insert("nominal_gdp".to_string(), series(&[13, 4, 26]));
        vars.insert("real_gdp".to_string(), series(&[13, 4, 25]));

        let err = Scenario::from_series("flood", vars).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidShape(_)), "{err}");
    }

    #[test]
    fn scenario_rejects_mismatched_experiments() {
        let mut vars = BTreeMap::new();
        vars.insert("a".to_string(), series(&[13, 4, 26]));
        vars.insert("b".to_string(), series(&[13, 5, 26]));
        assert!(Scenario::from_series("flood", vars).is_err());
    }

    #[test]
    fn describe_names_axes_by_position() {
        let mut vars = BTreeMap::new();
        vars.insert("real_sector_output".to_string(), series(&[2, 1, 3, 62]));
        let sc = Scenario::from_series("base", vars).unwrap();
        let info = sc.describe();
        assert_eq!(info[0].axes, vec!["time", "experiment", "country", "sector"]);
        assert_eq!(
            info[0].to_string(),
            "real_sector_output: [2, 1, 3, 62] (time, experiment, country, sector)"
        );
    }

    #[test]
    fn missing_variable_is_reported_with_scenario_name() {
        let sc = Scenario::from_series("drought", BTreeMap::new()).unwrap();
        let err = sc.get("wages").unwrap_err();
        assert_eq!(err.to_string(), "Variable not found: drought/wages");
    }
}
