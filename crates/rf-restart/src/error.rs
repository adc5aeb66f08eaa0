//! Container error types.

use thiserror::Error;

pub type RestartResult<T> = Result<T, RestartError>;

/// Errors raised while reading or writing a restart container.
#[derive(Error, Debug)]
pub enum RestartError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record framing or payload does not match the format.
    #[error("Malformed record at byte {offset}: {detail}")]
    MalformedRecord { offset: u64, detail: String },

    #[error("Unknown keyword type '{tag}' at byte {offset}")]
    UnknownType { tag: String, offset: u64 },

    /// A keyword cannot be represented in the format (writer side).
    #[error("Invalid keyword '{name}': {detail}")]
    InvalidKeyword { name: String, detail: String },

    #[error("No SEQNUM keyword found; not a restart file")]
    NoReportSteps,
}

pub(crate) fn malformed(offset: u64, detail: impl Into<String>) -> RestartError {
    RestartError::MalformedRecord {
        offset,
        detail: detail.into(),
    }
}
