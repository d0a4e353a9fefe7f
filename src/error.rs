use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Recoverable report failures, returned to the caller as data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Data not loaded.")]
    DataNotLoaded,

    #[error("Region '{0}' not found.")]
    RegionNotFound(String),

    #[error("No row matches '{token}' in column '{column}'.")]
    NoMatchFound { token: String, column: String },

    #[error("No data for '{0}'.")]
    NoDataForKey(String),

    #[error("No valid metric to analyze.")]
    NoValidMetrics,
}

/// Wire form of a failed report: `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl From<&ReportError> for ErrorPayload {
    fn from(err: &ReportError) -> Self {
        ErrorPayload {
            error: err.to_string(),
        }
    }
}

/// Failures of the ingestion collaborator
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of row objects")]
    NotATable,

    #[error("Row {row} is not a JSON object")]
    NotARow { row: usize },

    #[error("Row {row} has no text column '{column}'")]
    MissingColumn { row: usize, column: String },

    #[error("Row {row}, column '{column}': expected a number")]
    NotNumeric { row: usize, column: String },
}
