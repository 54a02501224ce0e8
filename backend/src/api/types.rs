//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::ColumnClass;
use crate::phonetic::{encode, normalize};
use crate::transform::{classify, CsvInfo, SoundexOutput, TransformStats};

/// Response to `POST /api/columns`: what a column picker needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsResponse {
    pub columns: Vec<String>,
    pub csv_info: CsvMetadata,
}

/// Response to `POST /api/soundex`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundexResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Always "ready"; failures use [`error_response`]
    pub status: String,

    /// Output header: input columns followed by the Soundex columns
    pub columns: Vec<String>,

    /// Output rows, in input order
    pub rows: Vec<Vec<String>>,

    /// Output CSV text (UTF-8, input delimiter)
    pub csv: String,

    pub csv_info: CsvMetadata,

    pub stats: TransformStats,
}

/// CSV file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

impl From<CsvInfo> for CsvMetadata {
    fn from(info: CsvInfo) -> Self {
        Self {
            encoding: info.encoding,
            delimiter: info.delimiter.to_string(),
            row_count: info.row_count,
            columns: info.headers,
        }
    }
}

impl From<CsvInfo> for ColumnsResponse {
    fn from(info: CsvInfo) -> Self {
        Self {
            columns: info.headers.clone(),
            csv_info: info.into(),
        }
    }
}

impl From<SoundexOutput> for SoundexResponse {
    fn from(output: SoundexOutput) -> Self {
        let csv = String::from_utf8_lossy(&output.csv).into_owned();
        let rows = read_rows(&output.csv, output.csv_info.delimiter);

        SoundexResponse {
            job_id: Uuid::new_v4().to_string(),
            status: "ready".to_string(),
            columns: output.output_header,
            rows,
            csv,
            csv_info: output.csv_info.into(),
            stats: output.stats,
        }
    }
}

/// Rows of a CSV the pipeline itself wrote.
fn read_rows(csv: &[u8], delimiter: char) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(csv)
        .records()
        .filter_map(Result::ok)
        .map(|r| r.iter().map(str::to_string).collect())
        .collect()
}

/// Query of `GET /api/encode`.
#[derive(Debug, Clone, Deserialize)]
pub struct EncodeQuery {
    pub word: String,
}

/// Response to `GET /api/encode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeResponse {
    pub word: String,
    pub class: ColumnClass,
    /// Phonetic surface form, absent unless the value is phonetic
    pub normalized: Option<String>,
    /// Value the Soundex column would hold
    pub value: String,
}

impl EncodeResponse {
    pub fn for_word(word: &str) -> Self {
        let class = classify(Some(word));
        let (normalized, value) = match class {
            ColumnClass::Phonetic => {
                let normalized = normalize(word);
                let code = encode(&normalized).into_string();
                (Some(normalized), code)
            }
            ColumnClass::PassThrough => (None, word.to_string()),
            ColumnClass::Empty => (None, String::new()),
        };

        Self {
            word: word.to_string(),
            class,
            normalized,
            value,
        }
    }
}

/// Split a comma-separated column list, dropping blanks.
pub fn parse_column_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "columns": [],
        "rows": []
    })
}

/// Error response listing the offending column names.
pub fn column_error_response(error: &str, columns: &[String]) -> Value {
    let mut body = error_response(error);
    body["invalidColumns"] = json!(columns);
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{soundex_bytes, TransformOptions};

    #[test]
    fn test_parse_column_list() {
        assert_eq!(parse_column_list(" name, ort ,,"), vec!["name", "ort"]);
        assert!(parse_column_list("").is_empty());
    }

    #[test]
    fn test_encode_response() {
        let r = EncodeResponse::for_word("Meyer");
        assert_eq!(r.class, ColumnClass::Phonetic);
        assert_eq!(r.normalized.as_deref(), Some("meier"));
        assert_eq!(r.value, "M600");

        let r = EncodeResponse::for_word("007");
        assert_eq!(r.class, ColumnClass::PassThrough);
        assert_eq!(r.value, "007");

        let r = EncodeResponse::for_word(" ");
        assert_eq!(r.class, ColumnClass::Empty);
        assert_eq!(r.value, "");
    }

    #[test]
    fn test_soundex_response_rows() {
        let output = soundex_bytes(
            "id;name\n1;Müller\n".as_bytes(),
            &["name"],
            &TransformOptions::default(),
        )
        .unwrap();
        let response = SoundexResponse::from(output);

        assert_eq!(response.status, "ready");
        assert_eq!(response.columns, vec!["id", "name", "name_soundex"]);
        assert_eq!(response.rows, vec![vec!["1", "Müller", "M460"]]);
        assert_eq!(response.csv_info.delimiter, ";");
    }

    #[test]
    fn test_column_error_response() {
        let body = column_error_response("Missing columns: email", &["email".to_string()]);
        assert_eq!(body["status"], "error");
        assert_eq!(body["invalidColumns"][0], "email");
    }
}
