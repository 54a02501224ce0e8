//! Row transformer: appends one Soundex column per requested column.
//!
//! Column validation happens once, in [`RowTransformer::new`]; after that
//! every record transforms infallibly.
//!
//! ```text
//! header:  id | name            requested: [name]
//! row:      1 | Müller    ──▶   1 | Müller | M460
//! ```

use serde::Serialize;
use std::collections::HashSet;

use super::classify::classify;
use crate::error::{TransformError, TransformResult};
use crate::models::{ColumnClass, Record};
use crate::phonetic::german_soundex;

/// Suffix appended to a column name to form its Soundex column.
pub const DEFAULT_SUFFIX: &str = "_soundex";

/// Name of the Soundex column derived from `column`.
pub fn derived_name(column: &str, suffix: &str) -> String {
    format!("{}{}", column, suffix)
}

/// A requested column resolved against the header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    source: String,
    index: usize,
    derived: String,
}

/// Appends Soundex columns to records of a fixed header.
#[derive(Debug, Clone)]
pub struct RowTransformer {
    header: Vec<String>,
    targets: Vec<Target>,
}

impl RowTransformer {
    /// Resolve `requested` against `header` with the default suffix.
    pub fn new<S: AsRef<str>>(header: &[String], requested: &[S]) -> TransformResult<Self> {
        Self::with_suffix(header, requested, DEFAULT_SUFFIX)
    }

    /// Resolve `requested` against `header`.
    ///
    /// Names are trimmed and duplicates collapse to their first occurrence.
    /// Fails with every missing name at once, then with every colliding
    /// derived name.
    pub fn with_suffix<S: AsRef<str>>(
        header: &[String],
        requested: &[S],
        suffix: &str,
    ) -> TransformResult<Self> {
        let mut seen = HashSet::new();
        let columns: Vec<&str> = requested
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| seen.insert(*c))
            .collect();

        if columns.is_empty() {
            return Err(TransformError::NoColumnsRequested);
        }

        let missing: Vec<String> = columns
            .iter()
            .filter(|c| !header.iter().any(|h| h == *c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TransformError::MissingColumns(missing));
        }

        let targets: Vec<Target> = columns
            .iter()
            .filter_map(|c| {
                header.iter().position(|h| h == c).map(|index| Target {
                    source: c.to_string(),
                    index,
                    derived: derived_name(c, suffix),
                })
            })
            .collect();

        let mut names: HashSet<&str> = header.iter().map(String::as_str).collect();
        let collisions: Vec<String> = targets
            .iter()
            .filter(|t| !names.insert(t.derived.as_str()))
            .map(|t| t.derived.clone())
            .collect();
        if !collisions.is_empty() {
            return Err(TransformError::ColumnCollision(collisions));
        }

        Ok(Self {
            header: header.to_vec(),
            targets,
        })
    }

    /// Input header.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Requested columns after trimming and de-duplication.
    pub fn columns(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.source.as_str()).collect()
    }

    /// Input header followed by the derived column names.
    pub fn output_header(&self) -> Vec<String> {
        self.header
            .iter()
            .cloned()
            .chain(self.targets.iter().map(|t| t.derived.clone()))
            .collect()
    }

    /// Transform one record.
    pub fn transform_record(&self, record: &Record) -> Record {
        self.augment(record, |_, _| {})
    }

    /// Transform one record, counting value classes into `stats`.
    pub fn transform_record_tracked(&self, record: &Record, stats: &mut TransformStats) -> Record {
        stats.rows += 1;
        self.augment(record, |i, class| stats.columns[i].count(class))
    }

    /// Lazily transform a stream of records, preserving order.
    pub fn transform<'a, I>(&'a self, records: I) -> impl Iterator<Item = Record> + 'a
    where
        I: IntoIterator<Item = Record>,
        I::IntoIter: 'a,
    {
        records
            .into_iter()
            .map(move |record| self.transform_record(&record))
    }

    /// Empty statistics for this transformer's columns.
    pub fn new_stats(&self) -> TransformStats {
        TransformStats {
            rows: 0,
            columns: self
                .targets
                .iter()
                .map(|t| ColumnStats::new(&t.source))
                .collect(),
        }
    }

    fn augment(&self, record: &Record, mut observe: impl FnMut(usize, ColumnClass)) -> Record {
        let mut values: Vec<Option<String>> = (0..self.header.len())
            .map(|i| record.get(i).map(str::to_string))
            .collect();

        for (i, target) in self.targets.iter().enumerate() {
            let raw = record.get(target.index);
            let class = classify(raw);
            observe(i, class);
            values.push(Some(derive_value(class, raw)));
        }

        Record::new(values)
    }
}

fn derive_value(class: ColumnClass, raw: Option<&str>) -> String {
    match (class, raw) {
        (ColumnClass::PassThrough, Some(value)) => value.to_string(),
        (ColumnClass::Phonetic, Some(value)) => german_soundex(value).into_string(),
        _ => String::new(),
    }
}

/// Per-column class counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    pub column: String,
    pub phonetic: usize,
    pub pass_through: usize,
    pub empty: usize,
}

impl ColumnStats {
    fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ..Default::default()
        }
    }

    fn count(&mut self, class: ColumnClass) {
        match class {
            ColumnClass::Phonetic => self.phonetic += 1,
            ColumnClass::PassThrough => self.pass_through += 1,
            ColumnClass::Empty => self.empty += 1,
        }
    }
}

/// Statistics gathered while transforming a record stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformStats {
    pub rows: usize,
    pub columns: Vec<ColumnStats>,
}

impl TransformStats {
    /// One line per column, for logs.
    pub fn summary(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| {
                format!(
                    "{}: {} encoded, {} passed through, {} empty",
                    c.column, c.phonetic, c.pass_through, c.empty
                )
            })
            .collect()
    }
}
