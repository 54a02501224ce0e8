//! # soundex-csv - German-phonetics Soundex columns for CSV files
//!
//! Adds one Soundex column per selected column so that spelling variants of
//! German names ("Meyer", "Meier", "Maier") share a code and can be matched.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│  CSV + code │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │  (phonetic) │     │   columns   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use soundex_csv::{soundex_csv, TransformOptions};
//! use std::path::Path;
//!
//! let result = soundex_csv(Path::new("input.csv"), &["Name"], &TransformOptions::default())?;
//! println!("Wrote {} rows", result.stats.rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Records, value classes and Soundex codes
//! - [`phonetic`] - German normalizer and Soundex encoder
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Classification, row transformation and pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Phonetics
pub mod phonetic;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, PipelineError, ServerError, TransformError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{ColumnClass, Record, SoundexCode};

// =============================================================================
// Re-exports - Phonetics
// =============================================================================

pub use phonetic::{encode, german_soundex, normalize, normalize_trace, TraceStep};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes_auto,
    parse_csv_file_auto,
    write_csv,
    CsvDocument,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    classify,
    default_output_path,
    inspect_bytes,
    inspect_csv,
    parse_delimiter,
    soundex_bytes,
    soundex_csv,
    ColumnStats,
    CsvInfo,
    RowTransformer,
    SoundexFileResult,
    SoundexOutput,
    TransformOptions,
    TransformStats,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ColumnsResponse, EncodeResponse, SoundexResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
