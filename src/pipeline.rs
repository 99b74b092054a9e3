//! Baseline-vs-shock analysis over whole scenarios.
//!
//! ```text
//!   Scenario (baseline)      Scenario (shock 1..n)
//!        │                        │   (rayon, one task per shock)
//!        ▼                        ▼
//!   prepare: <var>_mean, <var>_nace1 for the configured variables
//!        │                        │
//!        └──────────┬─────────────┘
//!                   ▼
//!   compare: rel / dif / dif_rel per tracked variable
//!                   │
//!                   ▼
//!   AnalysisOutput (+ symmetric ranges for headline and sector variable)
//! ```

use std::collections::BTreeMap;

use ndarray::ArrayD;
use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::data::aggregate::aggregate_array;
use crate::data::compare::{compare, symmetric_range, ComparisonKind, ValueRange};
use crate::data::model::Scenario;
use crate::data::sectors::SectorMap;
use crate::data::summary::{experiment_mean, ExperimentSummary, Summarizer};
use crate::error::{AnalysisError, Result};

/// A scenario's variables together with the derived means and sector aggregates.
#[derive(Debug, Clone)]
pub struct PreparedScenario {
    pub name: String,
    pub variables: BTreeMap<String, ArrayD<f64>>,
    /// Configured variables present in the scenario, followed by their derivatives.
    pub tracked: Vec<String>,
}

impl PreparedScenario {
    pub fn get(&self, variable: &str) -> Result<&ArrayD<f64>> {
        self.variables
            .get(variable)
            .ok_or_else(|| AnalysisError::MissingVariable(format!("{}/{variable}", self.name)))
    }
}

/// One shock scenario expressed against the baseline.
#[derive(Debug, Clone, Default)]
pub struct ScenarioComparison {
    pub scenario: String,
    pub values: BTreeMap<ComparisonKind, BTreeMap<String, ArrayD<f64>>>,
}

impl ScenarioComparison {
    pub fn get(&self, kind: ComparisonKind, variable: &str) -> Option<&ArrayD<f64>> {
        self.values.get(&kind)?.get(variable)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub base: PreparedScenario,
    pub shocks: Vec<PreparedScenario>,
    pub comparisons: Vec<ScenarioComparison>,
    /// Range of the configured comparison of the headline variable, over all shocks.
    pub headline_range: ValueRange,
    /// Same for the sector variable.
    pub sector_range: ValueRange,
}

/// Runs the analysis with a fixed configuration and sector map.
///
/// Holds only shared references, so one instance serves every scenario and
/// every rayon worker.
#[derive(Debug, Clone, Copy)]
pub struct Analysis<'a> {
    config: &'a AnalysisConfig,
    sectors: &'a SectorMap,
}

impl<'a> Analysis<'a> {
    pub fn new(config: &'a AnalysisConfig, sectors: &'a SectorMap) -> Self {
        Self { config, sectors }
    }

    /// Derive experiment means and sector aggregates.
    ///
    /// Variables that cannot be aggregated are logged and skipped.
    pub fn prepare(&self, scenario: &Scenario) -> PreparedScenario {
        let mut variables: BTreeMap<String, ArrayD<f64>> = scenario
            .variables
            .iter()
            .map(|(name, raw)| (name.clone(), raw.values().clone()))
            .collect();

        let mut tracked: Vec<String> = self
            .config
            .variables
            .iter()
            .filter(|v| scenario.contains(v))
            .cloned()
            .collect();

        let mut means = Vec::new();
        for var in &tracked {
            let mean = experiment_mean(variables[var].view());
            match mean {
                Ok(mean) => {
                    let name = self.config.mean_name(var);
                    variables.insert(name.clone(), mean);
                    means.push(name);
                }
                Err(err) => log::warn!("{}: no experiment mean for {var}: {err}", scenario.name),
            }
        }
        tracked.extend(means);

        let mut aggregates = Vec::new();
        for var in tracked.iter().filter(|v| v.contains("sector")) {
            let aggregated = aggregate_array(variables[var].view(), self.sectors, self.config.reduction);
            match aggregated {
                Ok(agg) => {
                    let name = self.config.aggregate_name(var);
                    variables.insert(name.clone(), agg);
                    aggregates.push(name);
                }
                Err(err) => {
                    log::warn!("{}: could not aggregate sectors for {var}: {err}", scenario.name);
                    log::warn!("Skipping sector aggregation for {var}");
                }
            }
        }
        tracked.extend(aggregates);

        log::debug!("{}: tracking {tracked:?}", scenario.name);
        PreparedScenario {
            name: scenario.name.clone(),
            variables,
            tracked,
        }
    }

    /// Compare every variable tracked in both scenarios, in all three ways.
    pub fn compare(&self, base: &PreparedScenario, shock: &PreparedScenario) -> ScenarioComparison {
        let mut out = ScenarioComparison {
            scenario: shock.name.clone(),
            values: BTreeMap::new(),
        };

        for var in &base.tracked {
            let (Some(b), Some(s)) = (base.variables.get(var), shock.variables.get(var)) else {
                continue;
            };
            if b.shape() != s.shape() {
                log::warn!(
                    "Shapes don't match for {var}. Base: {:?}, {}: {:?}",
                    b.shape(),
                    shock.name,
                    s.shape()
                );
                continue;
            }
            for kind in ComparisonKind::ALL {
                // shapes checked above
                if let Ok(values) = compare(kind, s.view(), b.view()) {
                    out.values.entry(kind).or_default().insert(var.clone(), values);
                }
            }
        }
        out
    }

    /// Prepare the baseline, then prepare and compare every shock scenario.
    ///
    /// Shock scenarios are independent and processed in parallel; the output
    /// keeps their input order.
    pub fn run(&self, base: &Scenario, shocks: &[Scenario]) -> Result<AnalysisOutput> {
        if shocks.is_empty() {
            return Err(AnalysisError::NoScenarios);
        }

        log::info!("Calculating means and aggregating sectors");
        let base = self.prepare(base);

        let (shocks, comparisons): (Vec<_>, Vec<_>) = shocks
            .par_iter()
            .map(|scenario| {
                let prepared = self.prepare(scenario);
                let comparison = self.compare(&base, &prepared);
                (prepared, comparison)
            })
            .unzip();

        let kind = self.config.comparison;
        let headline_range = self.range_of(&comparisons, kind, &self.config.headline_variable);
        let sector_range = self.range_of(&comparisons, kind, &self.config.sector_variable);
        log::info!(
            "{} {kind} range: {:.4} .. {:.4}",
            self.config.headline_variable,
            headline_range.min,
            headline_range.max
        );

        Ok(AnalysisOutput {
            base,
            shocks,
            comparisons,
            headline_range,
            sector_range,
        })
    }

    /// Experiment mean and percentile band of one prepared variable.
    pub fn summarize(&self, scenario: &PreparedScenario, variable: &str) -> Result<ExperimentSummary> {
        let summarizer = Summarizer::new(self.config.percentile_band)?;
        summarizer.summarize(scenario.get(variable)?.view())
    }

    fn range_of(
        &self,
        comparisons: &[ScenarioComparison],
        kind: ComparisonKind,
        variable: &str,
    ) -> ValueRange {
        let arrays: Vec<&ArrayD<f64>> = comparisons
            .iter()
            .filter_map(|c| c.get(kind, variable))
            .collect();
        if arrays.is_empty() {
            log::warn!("{variable} is missing from every comparison");
        }
        symmetric_range(arrays)
    }
}

/// Pair shock scenario files with display names.
///
/// Missing names become `scenario_<n>` (1-based); surplus names are dropped.
pub fn reconcile_names(names: &[String], shock_count: usize) -> Vec<String> {
    if names.len() != shock_count {
        log::warn!(
            "Number of scenario names ({}) doesn't match number of shock files ({shock_count})",
            names.len()
        );
    }
    (0..shock_count)
        .map(|i| {
            names
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("scenario_{}", i + 1))
        })
        .collect()
}
