use thiserror::Error;

/// Everything that can go wrong between decoded MAT variables and exported records.
///
/// All failures are deterministic for a given input, so none of them is retried.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Sector '{code}' (index {index}) has no coarse sector")]
    UnmappedSector { index: usize, code: String },

    #[error("Sector '{code}' (index {index}) matches several coarse sectors: {candidates:?}")]
    AmbiguousSector {
        index: usize,
        code: String,
        candidates: Vec<String>,
    },

    #[error("Invalid percentile band: low {low}, high {high}")]
    InvalidPercentile { low: f64, high: f64 },

    #[error("Variable not found: {0}")]
    MissingVariable(String),

    #[error("No shock scenarios to compare against the baseline")]
    NoScenarios,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AnalysisError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        AnalysisError::InvalidShape(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
