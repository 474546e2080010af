//! Error types shared across the volcano engine.

use thiserror::Error;

use crate::enrichment::EnrichmentError;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum VolcanoError {
    #[error("unknown selection type '{0}'")]
    UnknownSelectionType(String),

    #[error("unknown interaction mode '{0}'")]
    UnknownMode(String),

    #[error("unknown stats form field '{0}'")]
    UnknownStatsField(String),

    #[error("invalid value {value} for stats form field '{field}'")]
    InvalidStatsValue { field: String, value: f64 },

    #[error("malformed dataset: {0}")]
    Dataset(String),

    #[error("job failed: {0}")]
    Job(String),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VolcanoError>;
