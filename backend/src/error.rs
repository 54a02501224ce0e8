//! Error types for the Soundex CSV pipeline.
//!
//! - [`CsvError`] - CSV reading/writing errors
//! - [`TransformError`] - column selection errors raised before any row is processed
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! The phonetic core (normalizer, encoder, classifier) is total and has no
//! error type. Conversion between the layers is automatic via `From`
//! implementations, so `?` works across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading or writing CSV data.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read or write a file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// A row is structurally broken (e.g. an unterminated quote).
    #[error("Line {line}: {message}")]
    Malformed { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// The same column name appears twice in the header.
    #[error("Duplicate column name in header: '{0}'")]
    DuplicateHeader(String),

    /// Delimiter is not a single ASCII character.
    #[error("Invalid delimiter '{0}': must be a single ASCII character")]
    InvalidDelimiter(char),
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => CsvError::Io(e),
            csv::ErrorKind::Utf8 { err, .. } => CsvError::Encoding(err.to_string()),
            other => CsvError::Malformed {
                line,
                message: format!("{:?}", other),
            },
        }
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors detected while validating the requested columns against a header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Requested columns absent from the header, in request order.
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Derived column names that already exist or are produced twice.
    #[error("Derived column names collide with existing columns: {}", .0.join(", "))]
    ColumnCollision(Vec<String>),

    /// No column was requested.
    #[error("No columns requested")]
    NoColumnsRequested,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::soundex_csv`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Column validation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// IO error outside CSV handling (e.g. creating the output file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for column validation.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::MissingColumns(vec!["email".into()]);
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("email"));
    }

    #[test]
    fn test_missing_columns_lists_every_name() {
        let err = TransformError::MissingColumns(vec!["Ghost1".into(), "Ghost2".into()]);
        assert_eq!(err.to_string(), "Missing columns: Ghost1, Ghost2");
    }

    #[test]
    fn test_malformed_format() {
        let err = CsvError::Malformed {
            line: 5,
            message: "unterminated quote".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("unterminated quote"));
    }
}
