use std::collections::BTreeMap;

use super::model::{MatValue, RawSeries, Scenario};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Build a [`Scenario`] from the variables of one decoded MAT file.
///
/// Only type normalization happens here; values are not transformed.
///
/// Skipped entries:
/// * `__header__`, `__version__`, `__globals__` – MAT file bookkeeping
/// * char arrays
/// * single-element arrays (MATLAB stores scalars as 1x1 matrices)
/// * arrays with fewer than 2 or more than 4 axes
///
/// Fails with `InvalidShape` when the kept variables disagree on the time,
/// experiment or country extent.
pub fn load_scenario<I>(name: &str, variables: I) -> Result<Scenario>
where
    I: IntoIterator<Item = (String, MatValue)>,
{
    log::info!("Loading {name} data");

    let mut series = BTreeMap::new();
    for (var, value) in variables {
        if var.starts_with("__") {
            continue;
        }
        if let Some(raw) = normalize(&var, value) {
            series.insert(var, raw);
        }
    }

    let scenario = Scenario::from_series(name, series)?;
    log::debug!("{name}: {} variables, extents {:?}", scenario.len(), scenario.extents);
    for info in scenario.describe() {
        log::debug!("  {info}");
    }
    Ok(scenario)
}

fn normalize(var: &str, value: MatValue) -> Option<RawSeries> {
    let class = value.class_name();
    let Some(array) = value.into_f64() else {
        log::debug!("{var}: {class} is not a data array, ignoring");
        return None;
    };
    if array.len() <= 1 {
        log::debug!("{var}: scalar {class}, ignoring");
        return None;
    }
    match RawSeries::new(array) {
        Ok(raw) => Some(raw),
        Err(err) => {
            log::debug!("{var}: {err}, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use ndarray::{ArrayD, IxDyn};

    fn doubles(shape: &[usize]) -> MatValue {
        MatValue::Double(ArrayD::from_elem(IxDyn(shape), 2.0))
    }

    #[test]
    fn skips_header_text_and_scalars() {
        let vars = vec![
            ("__header__".to_string(), MatValue::Text("MATLAB 5.0 MAT-file".into())),
            ("__version__".to_string(), MatValue::Text("1.0".into())),
            ("label".to_string(), MatValue::Text("S2_Sc10000".into())),
            ("seed".to_string(), doubles(&[1, 1])),
            ("weights".to_string(), doubles(&[62])),
            ("real_output".to_string(), doubles(&[13, 2, 26])),
        ];

        let sc = load_scenario("earthquake", vars).unwrap();
        assert_eq!(sc.len(), 1);
        assert!(sc.contains("real_output"));
        assert_eq!(sc.name, "earthquake");
    }

    #[test]
    fn normalizes_numeric_classes() {
        let vars = vec![
            (
                "unemployment_rate".to_string(),
                MatValue::Single(ArrayD::from_elem(IxDyn(&[3, 2, 4]), 0.25f32)),
            ),
            (
                "government_debt".to_string(),
                MatValue::Int64(ArrayD::from_elem(IxDyn(&[3, 2, 4]), 7i64)),
            ),
        ];

        let sc = load_scenario("baseline", vars).unwrap();
        assert_eq!(sc.get("unemployment_rate").unwrap().values()[[0, 0, 0]], 0.25);
        assert_eq!(sc.get("government_debt").unwrap().values()[[2, 1, 3]], 7.0);
    }

    #[test]
    fn extent_mismatch_is_an_error() {
        let vars = vec![
            ("real_output".to_string(), doubles(&[13, 2, 26])),
            ("real_gdp".to_string(), doubles(&[12, 2, 26])),
        ];
        let err = load_scenario("flood", vars).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidShape(_)));
    }
}
