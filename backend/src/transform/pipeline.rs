//! High-level pipeline API: read a CSV, add Soundex columns, write it back.
//!
//! # Example
//!
//! ```rust,ignore
//! use soundex_csv::{soundex_csv, TransformOptions};
//! use std::path::Path;
//!
//! let result = soundex_csv(Path::new("kunden.csv"), &["Name", "Ort"], &TransformOptions::default())?;
//! println!("Wrote {}", result.output_path.display());
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::rows::{RowTransformer, TransformStats, DEFAULT_SUFFIX};
use crate::api::logs::{log_info, log_info_indent, log_success};
use crate::error::{CsvResult, PipelineResult};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, write_csv, CsvDocument};

/// Options for the Soundex pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Appended to a column name to name its Soundex column
    pub suffix: String,

    /// CSV delimiter; auto-detected when `None`
    pub delimiter: Option<char>,

    /// Output file; defaults to `<stem>_soundex.<ext>` next to the input
    pub output_path: Option<PathBuf>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            delimiter: None,
            output_path: None,
        }
    }
}

impl TransformOptions {
    /// Defaults overlaid with `SOUNDEX_SUFFIX` and `SOUNDEX_DELIMITER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(suffix) = lookup("SOUNDEX_SUFFIX").filter(|s| !s.is_empty()) {
            options.suffix = suffix;
        }
        if let Some(delimiter) = lookup("SOUNDEX_DELIMITER").and_then(|d| parse_delimiter(&d)) {
            options.delimiter = Some(delimiter);
        }
        options
    }
}

/// Parse a delimiter argument; accepts a single character or `\t`/`tab`.
pub fn parse_delimiter(value: &str) -> Option<char> {
    match value {
        "\\t" | "tab" | "TAB" => Some('\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
    }
}

/// CSV file information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl CsvInfo {
    fn from_document(doc: &CsvDocument) -> CsvResult<Self> {
        Ok(Self {
            encoding: doc.encoding.clone(),
            delimiter: doc.delimiter,
            headers: doc.headers.clone(),
            row_count: doc.row_count()?,
        })
    }
}

/// Result of a file run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundexFileResult {
    pub output_path: PathBuf,
    pub output_header: Vec<String>,
    pub csv_info: CsvInfo,
    pub stats: TransformStats,
}

/// Result of an in-memory run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundexOutput {
    /// Output CSV, UTF-8
    pub csv: Vec<u8>,
    pub output_header: Vec<String>,
    pub csv_info: CsvInfo,
    pub stats: TransformStats,
}

/// Default output path: `<stem>_soundex<.ext>` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, DEFAULT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, DEFAULT_SUFFIX),
    };
    input.with_file_name(name)
}

/// Read only the metadata of a CSV file (for column pickers).
pub fn inspect_csv(path: &Path, delimiter: Option<char>) -> PipelineResult<CsvInfo> {
    let doc = parse_csv_file_auto(path, delimiter)?;
    Ok(CsvInfo::from_document(&doc)?)
}

/// Read only the metadata of CSV bytes.
pub fn inspect_bytes(bytes: &[u8], delimiter: Option<char>) -> PipelineResult<CsvInfo> {
    let doc = parse_bytes_auto(bytes, delimiter)?;
    Ok(CsvInfo::from_document(&doc)?)
}

/// Add Soundex columns to a CSV file and write the result.
///
/// Columns are validated before the output file is created, so a
/// `MissingColumns` failure leaves nothing behind.
pub fn soundex_csv<S: AsRef<str>>(
    path: &Path,
    columns: &[S],
    options: &TransformOptions,
) -> PipelineResult<SoundexFileResult> {
    log_info(format!("📖 Reading {}", path.display()));
    let doc = parse_csv_file_auto(path, options.delimiter)?;
    let transformer = RowTransformer::with_suffix(&doc.headers, columns, &options.suffix)?;
    log_document(&doc, &transformer);

    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(path));

    let file = BufWriter::new(File::create(&output_path)?);
    let stats = write_transformed(file, &doc, &transformer)?;

    log_stats(&stats);
    log_success(format!("Wrote {}", output_path.display()));

    Ok(SoundexFileResult {
        output_path,
        output_header: transformer.output_header(),
        csv_info: CsvInfo {
            encoding: doc.encoding,
            delimiter: doc.delimiter,
            headers: doc.headers,
            row_count: stats.rows,
        },
        stats,
    })
}

/// Add Soundex columns to CSV bytes, returning the output in memory.
pub fn soundex_bytes<S: AsRef<str>>(
    bytes: &[u8],
    columns: &[S],
    options: &TransformOptions,
) -> PipelineResult<SoundexOutput> {
    let doc = parse_bytes_auto(bytes, options.delimiter)?;
    let transformer = RowTransformer::with_suffix(&doc.headers, columns, &options.suffix)?;
    log_document(&doc, &transformer);

    let mut csv = Vec::new();
    let stats = write_transformed(&mut csv, &doc, &transformer)?;
    log_stats(&stats);

    Ok(SoundexOutput {
        csv,
        output_header: transformer.output_header(),
        csv_info: CsvInfo {
            encoding: doc.encoding,
            delimiter: doc.delimiter,
            headers: doc.headers,
            row_count: stats.rows,
        },
        stats,
    })
}

fn write_transformed<W: std::io::Write>(
    out: W,
    doc: &CsvDocument,
    transformer: &RowTransformer,
) -> CsvResult<TransformStats> {
    let mut stats = transformer.new_stats();
    let records = doc
        .records()
        .map(|r| r.map(|record| transformer.transform_record_tracked(&record, &mut stats)));
    write_csv(out, doc.delimiter, &transformer.output_header(), records)?;
    Ok(stats)
}

fn log_document(doc: &CsvDocument, transformer: &RowTransformer) {
    log_success(format!("Detected encoding: {}", doc.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(doc.delimiter)));
    log_info(format!("📋 {} columns: {}", doc.headers.len(), doc.headers.join(", ")));
    log_info(format!("🔤 Soundex for: {}", transformer.columns().join(", ")));
}

fn log_stats(stats: &TransformStats) {
    log_success(format!("Processed {} rows", stats.rows));
    for line in stats.summary() {
        log_info_indent(line, 1);
    }
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, TransformError};
    use tempfile::tempdir;

    #[test]
    fn test_default_options() {
        let opts = TransformOptions::default();
        assert_eq!(opts.suffix, "_soundex");
        assert!(opts.delimiter.is_none());
        assert!(opts.output_path.is_none());
    }

    #[test]
    fn test_options_from_lookup() {
        let opts = TransformOptions::from_lookup(|key| match key {
            "SOUNDEX_SUFFIX" => Some("_sx".to_string()),
            "SOUNDEX_DELIMITER" => Some("tab".to_string()),
            _ => None,
        });
        assert_eq!(opts.suffix, "_sx");
        assert_eq!(opts.delimiter, Some('\t'));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";"), Some(';'));
        assert_eq!(parse_delimiter("\\t"), Some('\t'));
        assert_eq!(parse_delimiter(";;"), None);
        assert_eq!(parse_delimiter(""), None);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/kunden.csv")),
            PathBuf::from("/data/kunden_soundex.csv")
        );
        assert_eq!(
            default_output_path(Path::new("liste")),
            PathBuf::from("liste_soundex")
        );
    }

    #[test]
    fn test_soundex_bytes() {
        let input = "id,name\n1,Müller\n2,\n3,---\n";
        let out = soundex_bytes(input.as_bytes(), &["name"], &TransformOptions::default()).unwrap();

        assert_eq!(out.output_header, vec!["id", "name", "name_soundex"]);
        assert_eq!(
            String::from_utf8(out.csv).unwrap(),
            "id,name,name_soundex\n1,Müller,M460\n2,,\n3,---,---\n"
        );
        assert_eq!(out.stats.rows, 3);
        assert_eq!(out.csv_info.row_count, 3);
    }

    #[test]
    fn test_quoted_empty_value_keeps_its_row() {
        let out = soundex_bytes(b"name\nMeyer\n\"\"\nSchmidt\n", &["name"], &TransformOptions::default())
            .unwrap();

        assert_eq!(out.stats.rows, 3);
        assert_eq!(out.stats.columns[0].empty, 1);
        assert_eq!(
            String::from_utf8(out.csv).unwrap(),
            "name;name_soundex\nMeyer;M600\n;\nSchmidt;S530\n"
        );
    }

    #[test]
    fn test_soundex_bytes_missing_columns() {
        let err = soundex_bytes(b"id,name\n1,x\n", &["name", "email"], &TransformOptions::default())
            .unwrap_err();
        match err {
            PipelineError::Transform(TransformError::MissingColumns(names)) => {
                assert_eq!(names, vec!["email"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_soundex_csv_writes_next_to_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("namen.csv");
        std::fs::write(&input, "Vorname;Nachname\nStefan;Schmidt\nJörg;Meyer\n").unwrap();

        let result = soundex_csv(&input, &["Nachname", "Vorname"], &TransformOptions::default()).unwrap();

        assert_eq!(result.output_path, dir.path().join("namen_soundex.csv"));
        let written = std::fs::read_to_string(&result.output_path).unwrap();
        assert_eq!(
            written,
            "Vorname;Nachname;Nachname_soundex;Vorname_soundex\n\
             Stefan;Schmidt;S530;S315\n\
             Jörg;Meyer;M600;J620\n"
        );
    }

    #[test]
    fn test_soundex_csv_latin1_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("latin1.csv");
        // "name\nMüller\nKönig\n" in ISO-8859-1
        let mut bytes = b"name\nM".to_vec();
        bytes.extend_from_slice(&[0xFC]);
        bytes.extend_from_slice(b"ller\nK");
        bytes.extend_from_slice(&[0xF6]);
        bytes.extend_from_slice(b"nig\n");
        std::fs::write(&input, bytes).unwrap();

        let options = TransformOptions {
            output_path: Some(dir.path().join("out.csv")),
            ..Default::default()
        };
        let result = soundex_csv(&input, &["name"], &options).unwrap();
        let written = std::fs::read_to_string(&result.output_path).unwrap();
        assert!(written.contains("M460"));
        assert!(written.contains("K520"));
    }

    #[test]
    fn test_missing_columns_create_no_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("a.csv");
        std::fs::write(&input, "id,name\n1,x\n").unwrap();

        let result = soundex_csv(&input, &["Ghost1", "Ghost2"], &TransformOptions::default());
        assert!(result.is_err());
        assert!(!dir.path().join("a_soundex.csv").exists());
    }

    #[test]
    fn test_inspect_bytes() {
        let info = inspect_bytes(b"a|b|c\n1|2|3\n4|5|6\n", None).unwrap();
        assert_eq!(info.delimiter, '|');
        assert_eq!(info.headers, vec!["a", "b", "c"]);
        assert_eq!(info.row_count, 2);
    }
}
