//! Error types for well solution extraction.

use std::path::PathBuf;

use rf_core::RfError;
use rf_restart::RestartError;
use thiserror::Error;

/// Result type for well solution operations.
pub type WellResult<T> = Result<T, WellError>;

/// Errors surfaced by [`WellSolution`](crate::WellSolution) and its helpers.
#[derive(Error, Debug)]
pub enum WellError {
    /// The restart file is missing, unreadable, or not a valid container.
    #[error("Failed to open restart file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        source: RestartError,
    },

    /// A required keyword is absent for the requested grid and step.
    #[error("Missing field {keyword} for grid {grid_index} at report step {report_step}")]
    MissingField {
        keyword: String,
        grid_index: usize,
        report_step: i32,
    },

    #[error("Report step {report_step} not found in restart file")]
    StepNotFound { report_step: i32 },

    /// Array lengths or values disagree with the declared layout.
    #[error("Malformed {keyword} record: {detail}")]
    MalformedRecord { keyword: String, detail: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Reading from an already opened container failed.
    #[error("Restart read error: {0}")]
    Restart(#[from] RestartError),
}

impl From<RfError> for WellError {
    fn from(err: RfError) -> Self {
        WellError::InvalidArg {
            what: err.to_string(),
        }
    }
}

pub(crate) fn malformed(keyword: &str, detail: impl Into<String>) -> WellError {
    WellError::MalformedRecord {
        keyword: keyword.to_string(),
        detail: detail.into(),
    }
}
