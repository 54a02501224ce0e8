//! Domain models for Soundex CSV processing.
//!
//! - [`Record`] - one CSV row, positionally aligned with its header
//! - [`ColumnClass`] - how a raw cell value is treated
//! - [`SoundexCode`] - the 4-symbol phonetic code

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Record
// =============================================================================

/// A single row, aligned with a header by position.
///
/// A `None` value means the field is missing from the input (a short row).
/// Missing values are written back as empty fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<Option<String>>,
}

impl Record {
    /// Create a record from raw values.
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    /// Create a record where every field is present.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: fields.into_iter().map(|f| Some(f.into())).collect(),
        }
    }

    /// Value at `index`, `None` if missing.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Fields as strings, missing values rendered empty.
    pub fn to_fields(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| v.clone().unwrap_or_default())
            .collect()
    }
}

// =============================================================================
// ColumnClass
// =============================================================================

/// Treatment decided for a raw cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnClass {
    /// Missing, empty, or whitespace only. Produces an empty field.
    Empty,
    /// Only digits, or only non-alphanumeric characters. Copied verbatim.
    PassThrough,
    /// Anything else. Encoded with the German Soundex.
    Phonetic,
}

impl fmt::Display for ColumnClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnClass::Empty => "empty",
            ColumnClass::PassThrough => "pass-through",
            ColumnClass::Phonetic => "phonetic",
        };
        f.write_str(name)
    }
}

// =============================================================================
// SoundexCode
// =============================================================================

/// A Soundex code: empty, or an uppercase letter followed by three digits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundexCode(String);

impl SoundexCode {
    /// Length of every non-empty code.
    pub const LEN: usize = 4;

    /// The code produced for words without any letter.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Build a code from the first letter and its collected digits,
    /// padding with `'0'` and truncating to [`Self::LEN`].
    pub(crate) fn from_parts(first: char, digits: &str) -> Self {
        let mut code = String::with_capacity(Self::LEN);
        code.push(first);
        code.extend(digits.chars().chain(std::iter::repeat('0')).take(Self::LEN - 1));
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SoundexCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SoundexCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SoundexCode> for String {
    fn from(code: SoundexCode) -> Self {
        code.0
    }
}

impl PartialEq<&str> for SoundexCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
