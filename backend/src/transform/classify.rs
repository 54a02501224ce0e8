//! Decides how a raw cell value is treated.

use crate::models::ColumnClass;

/// Classify a raw value.
///
/// - `Empty`: missing, or nothing left after trimming whitespace
/// - `PassThrough`: only decimal digits `0-9`, or no alphanumeric character at all
/// - `Phonetic`: everything else
///
/// The value is inspected as-is; surrounding whitespace makes `" 42 "`
/// phonetic, not pass-through.
pub fn classify(value: Option<&str>) -> ColumnClass {
    let Some(value) = value else {
        return ColumnClass::Empty;
    };

    if value.trim().is_empty() {
        ColumnClass::Empty
    } else if value.chars().all(|c| c.is_ascii_digit()) || !value.chars().any(char::is_alphanumeric) {
        ColumnClass::PassThrough
    } else {
        ColumnClass::Phonetic
    }
}
