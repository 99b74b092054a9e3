//! Analysis configuration and axis labels.
//!
//! Both structs are built once and handed to the components that need them.

use serde::{Deserialize, Serialize};

use crate::data::aggregate::Reduction;
use crate::data::compare::ComparisonKind;
use crate::data::summary::PercentileBand;
use crate::error::{AnalysisError, Result};
use crate::reference;

/// Settings for deriving, comparing and summarizing scenario variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Variables that get experiment means, sector aggregates and comparisons.
    pub variables: Vec<String>,

    /// Experiment spread reported next to the mean.
    pub percentile_band: PercentileBand,

    /// How fine sectors combine into coarse sectors.
    pub reduction: Reduction,

    /// Appended to a variable name for its experiment mean.
    pub mean_suffix: String,

    /// Appended to a variable name for its sector aggregate.
    pub aggregate_suffix: String,

    /// Country-level variable whose range is tracked across scenarios.
    pub headline_variable: String,

    /// Sector-level variable whose range is tracked across scenarios.
    pub sector_variable: String,

    /// Comparison used for the tracked ranges.
    pub comparison: ComparisonKind,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            variables: reference::VARIABLES_OF_INTEREST
                .iter()
                .map(|v| v.to_string())
                .collect(),
            percentile_band: PercentileBand::default(),
            reduction: Reduction::Sum,
            mean_suffix: "_mean".to_string(),
            aggregate_suffix: "_nace1".to_string(),
            headline_variable: "real_output_mean".to_string(),
            sector_variable: "real_sector_output_mean_nace1".to_string(),
            comparison: ComparisonKind::RelativeDifference,
        }
    }
}

impl AnalysisConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.percentile_band.validate()?;
        if self.mean_suffix.is_empty() || self.aggregate_suffix.is_empty() {
            return Err(AnalysisError::Config(
                "derived-variable suffixes must not be empty".to_string(),
            ));
        }
        if self.mean_suffix == self.aggregate_suffix {
            return Err(AnalysisError::Config(format!(
                "mean and aggregate suffix are both '{}'",
                self.mean_suffix
            )));
        }
        Ok(())
    }

    pub fn mean_name(&self, variable: &str) -> String {
        format!("{variable}{}", self.mean_suffix)
    }

    pub fn aggregate_name(&self, variable: &str) -> String {
        format!("{variable}{}", self.aggregate_suffix)
    }
}

// ---------------------------------------------------------------------------
// Dimensions – labels for the model's axes
// ---------------------------------------------------------------------------

/// Human-readable labels for each axis of the model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub time: Vec<String>,
    pub experiments: Vec<String>,
    pub countries: Vec<String>,
    pub countries_iso3: Vec<String>,
    pub fine_sectors: Vec<String>,
    pub coarse_sectors: Vec<String>,
}

impl Default for Dimensions {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            time: (0..reference::TIME_STEPS).map(|i| format!("Quarter {i}")).collect(),
            experiments: (0..reference::EXPERIMENTS).map(|i| format!("E{i}")).collect(),
            countries: owned(&reference::COUNTRY_CODES),
            countries_iso3: owned(&reference::COUNTRY_CODES_ISO3),
            fine_sectors: owned(&reference::SECTORS_NACE_62),
            coarse_sectors: owned(&reference::SECTORS_NACE_1),
        }
    }
}

impl Dimensions {
    /// Restrict labels to the extents actually present in a scenario.
    pub fn truncated(&self, time_steps: usize, experiments: usize, countries: usize) -> Self {
        let head = |xs: &[String], n: usize| xs.iter().take(n).cloned().collect::<Vec<_>>();
        Self {
            time: head(&self.time, time_steps),
            experiments: head(&self.experiments, experiments),
            countries: head(&self.countries, countries),
            countries_iso3: head(&self.countries_iso3, countries),
            fine_sectors: self.fine_sectors.clone(),
            coarse_sectors: self.coarse_sectors.clone(),
        }
    }

    pub fn country_index(&self, code: &str) -> Option<usize> {
        self.countries
            .iter()
            .position(|c| c == code)
            .or_else(|| self.countries_iso3.iter().position(|c| c == code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tables() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.variables.len(), 37);
        assert_eq!(cfg.mean_name("real_output"), "real_output_mean");
        assert_eq!(
            cfg.aggregate_name(&cfg.mean_name("real_sector_output")),
            cfg.sector_variable
        );
        cfg.validate().unwrap();

        let dims = Dimensions::default();
        assert_eq!(dims.time.len(), 13);
        assert_eq!(dims.time[0], "Quarter 0");
        assert_eq!(dims.experiments[17], "E17");
        assert_eq!(dims.country_index("DE"), Some(5));
        assert_eq!(dims.country_index("SVK"), Some(25));
        assert_eq!(dims.country_index("US"), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = AnalysisConfig::from_json(
            r#"{
                "variables": ["real_output", "real_sector_output"],
                "percentile_band": { "low": 10.0, "high": 90.0 },
                "reduction": "mean",
                "comparison": "dif"
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.variables, vec!["real_output", "real_sector_output"]);
        assert_eq!(cfg.percentile_band, PercentileBand { low: 10.0, high: 90.0 });
        assert_eq!(cfg.reduction, Reduction::Mean);
        assert_eq!(cfg.comparison, ComparisonKind::Difference);
        assert_eq!(cfg.aggregate_suffix, "_nace1");
    }

    #[test]
    fn invalid_json_config_is_rejected() {
        let err = AnalysisConfig::from_json(r#"{ "percentile_band": { "low": 80, "high": 20 } }"#)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidPercentile { .. }));

        let err = AnalysisConfig::from_json(r#"{ "mean_suffix": "" }"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));

        let err = AnalysisConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AnalysisError::Json(_)));
    }

    #[test]
    fn truncated_dimensions() {
        let dims = Dimensions::default().truncated(4, 2, 3);
        assert_eq!(dims.time.len(), 4);
        assert_eq!(dims.experiments, vec!["E0", "E1"]);
        assert_eq!(dims.countries, vec!["AT", "BE", "BG"]);
        assert_eq!(dims.fine_sectors.len(), 62);
    }
}
