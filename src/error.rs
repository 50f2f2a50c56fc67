//! Error types for report runs

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while building a premium report.
///
/// Malformed policy fields never show up here: they degrade to invalid
/// markers during sanitization. Only configuration problems, unsupported
/// tax jurisdictions and I/O failures abort a run.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A file could not be opened or created.
    #[error("Failed to access file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV framing or deserialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input table is missing a required column.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// No tax rate is configured for the policy's state.
    #[error("Unsupported state {state:?} on row {row}")]
    UnsupportedState { row: usize, state: String },

    /// A tax table entry is negative, non-finite or unparsable.
    #[error("Invalid tax rate for {state:?}: {value}")]
    InvalidTaxRate { state: String, value: String },

    /// The report date could not be parsed.
    #[error("Invalid report date {0:?} (expected YYYY-MM-DD)")]
    InvalidReportDate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_state_message() {
        let err = ReportError::UnsupportedState {
            row: 7,
            state: "CA".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported state \"CA\" on row 7");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ReportError = io.into();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
