//! Post-processing for agent-based macroeconomic model runs: load scenario
//! output, aggregate NACE sectors, summarize experiments and compare shock
//! scenarios against a baseline.

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod reference;

pub use config::{AnalysisConfig, Dimensions};
pub use data::aggregate::{aggregate, aggregate_array, Reduction};
pub use data::loader::load_scenario;
pub use data::model::{AggregatedSeries, MatValue, RawSeries, Scenario};
pub use data::sectors::SectorMap;
pub use data::summary::{ExperimentSummary, PercentileBand, Summarizer};
pub use error::{AnalysisError, Result};
pub use pipeline::{Analysis, AnalysisOutput, PreparedScenario, ScenarioComparison};
