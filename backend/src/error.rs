//! Error types for report generation.
//!
//! Batch-level failures (missing columns, empty or oversized input) abort the
//! whole request. Per-pitcher failures (a single render, a single cohort
//! aggregation) are isolated by the batch runner and reported alongside the
//! pitchers that succeeded.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::PitcherId;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Application error type for the report engine.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Aggregation was invoked on a cohort with zero rows. The cohort
    /// builder never produces one, but the aggregator guards anyway.
    #[error("cannot aggregate empty cohort for pitch type '{pitch_type}'")]
    EmptyCohort { pitch_type: String },

    /// The requested pitcher id has no rows in this batch.
    #[error("pitcher {0} has no rows in this batch")]
    UnknownPitcher(PitcherId),

    /// A required column is absent from the input. Raised before any
    /// aggregation begins.
    #[error("required column '{0}' is missing from the input")]
    MissingField(String),

    /// The input contained headers but no data rows.
    #[error("input contains no data rows")]
    EmptyInput,

    /// A key column held a value that could not be coerced.
    #[error("invalid value in column '{column}' at line {line}")]
    InvalidValue { column: String, line: u64 },

    /// The input exceeds the row or column cap.
    #[error("input too large: {rows} rows x {columns} columns (limits: {max_rows} rows, {max_columns} columns)")]
    InputTooLarge {
        rows: usize,
        columns: usize,
        max_rows: usize,
        max_columns: usize,
    },

    /// A density or scatter rendering pass could not complete.
    #[error("failed to render '{path}': {message}")]
    Render { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportError {
    /// Wrap a rendering backend error for the given output path.
    pub fn render(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        ReportError::Render {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_field_message_names_column() {
        let err = ReportError::MissingField("SpinRate".to_string());
        assert!(err.to_string().contains("SpinRate"));
    }

    #[test]
    fn test_render_wrapper_keeps_path_and_message() {
        let err = ReportError::render(Path::new("/tmp/out.png"), "disk full");
        let msg = err.to_string();
        assert!(msg.contains("out.png"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_unknown_pitcher_displays_id() {
        let err = ReportError::UnknownPitcher(PitcherId::new(1000066910));
        assert!(err.to_string().contains("1000066910"));
    }
}
