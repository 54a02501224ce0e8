//! CSV input/output with encoding and delimiter auto-detection.
//!
//! Reading decodes the whole file up front (encoding detection needs the
//! bytes), then hands out records lazily. Values are never trimmed: a
//! pass-through value must come back exactly as it was read.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::Record;

/// Delimiters considered by [`detect_delimiter`], in tie-break order.
const SEPARATORS: [char; 4] = [';', ',', '\t', '|'];

/// A decoded CSV document.
#[derive(Debug, Clone)]
pub struct CsvDocument {
    content: String,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

impl CsvDocument {
    /// Parse decoded content with an explicit delimiter.
    pub fn parse(content: String, delimiter: char, encoding: String) -> CsvResult<Self> {
        let delimiter_byte = delimiter_byte(delimiter)?;

        if content.trim().is_empty() {
            return Err(CsvError::EmptyFile);
        }

        let headers: Vec<String> = {
            let mut reader = reader(&content, delimiter_byte);
            reader.headers()?.iter().map(str::to_string).collect()
        };

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(CsvError::NoHeaders);
        }

        let mut seen = HashSet::new();
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(CsvError::DuplicateHeader(dup.clone()));
        }

        Ok(Self {
            content,
            encoding,
            delimiter,
            headers,
        })
    }

    /// Lazily read data records. Extra fields beyond the header are dropped;
    /// missing trailing fields stay missing.
    pub fn records(&self) -> impl Iterator<Item = CsvResult<Record>> + '_ {
        // `parse` already validated the delimiter
        let delimiter = self.delimiter as u8;
        let width = self.headers.len();

        reader(&self.content, delimiter)
            .into_records()
            .map(move |row| -> CsvResult<Record> {
                let row = row?;
                Ok(Record::new(
                    row.iter().take(width).map(|v| Some(v.to_string())).collect(),
                ))
            })
    }

    /// Number of data records; fails on the first malformed one.
    pub fn row_count(&self) -> CsvResult<usize> {
        self.records().try_fold(0, |n, r| r.map(|_| n + 1))
    }
}

fn reader(content: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn delimiter_byte(delimiter: char) -> CsvResult<u8> {
    if delimiter.is_ascii() && delimiter != '"' && delimiter != '\n' && delimiter != '\r' {
        Ok(delimiter as u8)
    } else {
        Err(CsvError::InvalidDelimiter(delimiter))
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as UTF-8. Otherwise chardet decides between
/// ISO-8859-1 and Windows-1252; anything else it reports falls back to
/// Windows-1252, which covers every printable Latin-1 character.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let (charset, _confidence, _language) = chardet::detect(bytes);
    match charset.to_lowercase().as_str() {
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        _ => "windows-1252".to_string(),
    }
}

/// Decode bytes to string using the specified encoding.
///
/// A leading UTF-8 byte order mark is removed.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        // Windows-1252 agrees with ISO-8859-1 on every printable byte
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    match decoded.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = SEPARATORS[0];
    let mut best_count = 0;

    for &sep in &SEPARATORS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV bytes, detecting the encoding and, unless given, the delimiter.
pub fn parse_bytes_auto(bytes: &[u8], delimiter: Option<char>) -> CsvResult<CsvDocument> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    CsvDocument::parse(content, delimiter, encoding)
}

/// Read and parse a CSV file with auto-detection.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<CsvDocument> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes, delimiter)
}

/// Write a header and records as UTF-8 CSV. Returns the number of records.
pub fn write_csv<W, I>(out: W, delimiter: char, header: &[String], records: I) -> CsvResult<usize>
where
    W: Write,
    I: IntoIterator<Item = CsvResult<Record>>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .flexible(true)
        .from_writer(out);

    writer.write_record(header)?;

    let mut count = 0;
    for record in records {
        writer.write_record(record?.to_fields())?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(csv: &str, delimiter: char) -> CsvDocument {
        CsvDocument::parse(csv.to_string(), delimiter, "utf-8".to_string()).unwrap()
    }

    fn rows(doc: &CsvDocument) -> Vec<Record> {
        doc.records().collect::<CsvResult<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_simple_csv() {
        let d = doc("name;age\nAlice;30\nBob;25", ';');
        let r = rows(&d);

        assert_eq!(d.headers, vec!["name", "age"]);
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].get(0), Some("Alice"));
        assert_eq!(r[1].get(1), Some("25"));
    }

    #[test]
    fn test_quoted_values() {
        let d = doc("name,value\n\"Müller, Hans\",\"say \"\"hi\"\"\"", ',');
        let r = rows(&d);

        assert_eq!(r[0].get(0), Some("Müller, Hans"));
        assert_eq!(r[0].get(1), Some("say \"hi\""));
    }

    #[test]
    fn test_values_not_trimmed() {
        let d = doc("a;b\n  x ; 007 ", ';');
        let r = rows(&d);
        assert_eq!(r[0].get(0), Some("  x "));
        assert_eq!(r[0].get(1), Some(" 007 "));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let d = doc("a;b\n1;2\n\n3;4\n", ';');
        assert_eq!(d.row_count().unwrap(), 2);
    }

    #[test]
    fn test_quoted_empty_row_kept() {
        let d = doc("name\nMeyer\n\"\"\nSchmidt\n", ';');
        let r = rows(&d);
        assert_eq!(r.len(), 3);
        assert_eq!(r[1].get(0), Some(""));
    }

    #[test]
    fn test_short_rows_have_missing_values() {
        let d = doc("a;b;c\n1", ';');
        let r = rows(&d);
        assert_eq!(r[0].get(0), Some("1"));
        assert_eq!(r[0].get(1), None);
        assert_eq!(r[0].values().len(), 1);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let d = doc("a;b\n1;2;3;4", ';');
        let r = rows(&d);
        assert_eq!(r[0].to_fields(), vec!["1", "2"]);
    }

    #[test]
    fn test_empty_csv_error() {
        let err = CsvDocument::parse(String::new(), ';', "utf-8".into()).unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile));
        assert!(matches!(parse_bytes_auto(b"", None), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = CsvDocument::parse("a;b;a\n1;2;3".into(), ';', "utf-8".into()).unwrap_err();
        assert!(matches!(err, CsvError::DuplicateHeader(ref h) if h == "a"));
    }

    #[test]
    fn test_invalid_delimiter() {
        let err = CsvDocument::parse("a§b".into(), '§', "utf-8".into()).unwrap_err();
        assert!(matches!(err, CsvError::InvalidDelimiter('§')));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("name\nMeyer"), ';');
    }

    #[test]
    fn test_auto_parse() {
        let d = parse_bytes_auto("id,name\n1,Schmidt".as_bytes(), None).unwrap();
        assert_eq!(d.delimiter, ',');
        assert_eq!(d.encoding, "utf-8");
        assert_eq!(d.headers, vec!["id", "name"]);
    }

    #[test]
    fn test_bom_stripped() {
        let d = parse_bytes_auto("\u{FEFF}name;id\nMeyer;1".as_bytes(), None).unwrap();
        assert_eq!(d.headers[0], "name");
    }

    #[test]
    fn test_detect_encoding() {
        assert_eq!(detect_encoding("Müller".as_bytes()), "utf-8");
        let latin1: &[u8] = &[0x4D, 0xFC, 0x6C, 0x6C, 0x65, 0x72];
        assert_ne!(detect_encoding(latin1), "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Müller" in ISO-8859-1
        let bytes: &[u8] = &[0x4D, 0xFC, 0x6C, 0x6C, 0x65, 0x72];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "Müller");
    }

    #[test]
    fn test_latin1_currency_sign() {
        // 0xA4 is the currency sign in ISO-8859-1, the euro sign in ISO-8859-15
        assert_eq!(decode_content(&[0x31, 0xA4], "iso-8859-1"), "1¤");
    }

    #[test]
    fn test_write_csv() {
        let header = vec!["id".to_string(), "name".to_string()];
        let records = vec![
            Ok(Record::from_fields(["1", "Meyer; Hans"])),
            Ok(Record::new(vec![Some("2".into()), None])),
        ];
        let mut out = Vec::new();
        let n = write_csv(&mut out, ';', &header, records).unwrap();

        assert_eq!(n, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id;name\n1;\"Meyer; Hans\"\n2;\n"
        );
    }
}
