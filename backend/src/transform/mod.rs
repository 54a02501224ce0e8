//! Transformation module.
//!
//! - Classify: decide how each cell value is treated
//! - Rows: append Soundex columns to records
//! - Pipeline: read, transform and write whole CSV files

pub mod classify;
pub mod pipeline;
pub mod rows;

pub use classify::classify;
pub use pipeline::*;
pub use rows::{derived_name, ColumnStats, RowTransformer, TransformStats, DEFAULT_SUFFIX};
