// CSV import/export

use std::fs::File;
use std::io::Write;
use std::path::Path;

use encoding_rs::Encoding;
use xlsel_engine::table::normalize_headers;
use xlsel_engine::{Cell, Table};

use crate::error::IoError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One candidate text encoding for CSV input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvEncoding {
    Utf8,
    /// UTF-8 with a leading byte-order mark.
    Utf8Sig,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    Other(&'static Encoding),
}

impl CsvEncoding {
    pub fn from_label(label: &str) -> Result<Self, IoError> {
        let norm = label.trim().to_ascii_lowercase();
        match norm.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(Self::Utf8Sig),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Self::Latin1),
            _ => Encoding::for_label(norm.as_bytes())
                .map(Self::Other)
                .ok_or_else(|| IoError::UnknownEncoding(label.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Sig => "utf-8-sig",
            Self::Latin1 => "latin1",
            Self::Other(enc) => enc.name(),
        }
    }

    /// Strict decode: `None` when the bytes are not valid in this encoding.
    fn decode(&self, bytes: &[u8]) -> Option<(String, &'static str)> {
        match self {
            Self::Utf8 | Self::Utf8Sig => {
                let has_bom = bytes.starts_with(UTF8_BOM);
                if *self == Self::Utf8Sig && !has_bom {
                    return None;
                }
                let body = if has_bom { &bytes[UTF8_BOM.len()..] } else { bytes };
                let text = std::str::from_utf8(body).ok()?.to_string();
                let label = if has_bom { "utf-8-sig" } else { "utf-8" };
                Some((text, label))
            }
            Self::Latin1 => Some((bytes.iter().map(|&b| b as char).collect(), "latin1")),
            Self::Other(enc) => enc
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| (text.into_owned(), enc.name())),
        }
    }
}

/// Candidate encodings tried in order when none is configured.
pub fn default_encodings() -> Vec<CsvEncoding> {
    vec![
        CsvEncoding::Utf8,
        CsvEncoding::Other(encoding_rs::GBK),
        CsvEncoding::Utf8Sig,
        CsvEncoding::Other(encoding_rs::WINDOWS_1252),
        CsvEncoding::Latin1,
    ]
}

/// Parse a list of labels, failing on the first unknown one.
pub fn parse_encodings<S: AsRef<str>>(labels: &[S]) -> Result<Vec<CsvEncoding>, IoError> {
    labels.iter().map(|l| CsvEncoding::from_label(l.as_ref())).collect()
}

/// A decoded CSV file.
#[derive(Debug, Clone)]
pub struct CsvData {
    pub table: Table,
    /// Label of the encoding that decoded the file.
    pub encoding: String,
    /// Physical lines in the file, header included.
    pub line_count: usize,
}

pub fn import(path: &Path, encodings: &[CsvEncoding]) -> Result<CsvData, IoError> {
    let bytes = std::fs::read(path).map_err(|e| IoError::read(path, e))?;
    let (content, encoding) = decode(path, &bytes, encodings)?;
    log::debug!("decoded {} as {}", path.display(), encoding);

    let delimiter = sniff_delimiter(&content);
    let table = import_from_string(&content, delimiter).map_err(|e| IoError::read(path, e))?;

    Ok(CsvData {
        table,
        encoding: encoding.to_string(),
        line_count: content.lines().count(),
    })
}

/// Try each candidate encoding in order; the first strict success wins.
fn decode(
    path: &Path,
    bytes: &[u8],
    encodings: &[CsvEncoding],
) -> Result<(String, &'static str), IoError> {
    for enc in encodings {
        if let Some(decoded) = enc.decode(bytes) {
            return Ok(decoded);
        }
        log::debug!("{} is not valid {}", path.display(), enc.label());
    }
    Err(IoError::Undecodable {
        path: path.to_path_buf(),
        tried: encodings.iter().map(|e| e.label().to_string()).collect(),
    })
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (comma, semicolon, tab, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins; comma wins ties.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b',', b';', b'\t', b'|'];
    let sample_lines: Vec<&str> = content.lines().filter(|l| !l.is_empty()).take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| e.to_string())?,
        None => return Err("file is empty, no header row".to_string()),
    };
    let columns = normalize_headers(&header.iter().map(str::to_string).collect::<Vec<_>>());
    let width = columns.len();

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(|e| e.to_string())?;
        let mut row: Vec<Cell> = record.iter().map(Cell::text).collect();

        if row.len() > width {
            if row[width..].iter().any(|c| !c.is_missing()) {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    width,
                    row.len()
                ));
            }
            row.truncate(width);
        }
        row.resize(width, Cell::Empty);
        rows.push(row);
    }

    Table::new(columns, rows).map_err(|e| e.to_string())
}

/// Write `table` as UTF-8 CSV with a byte-order mark.
pub fn export(table: &Table, path: &Path) -> Result<(), IoError> {
    let mut file = File::create(path).map_err(|e| IoError::write(path, e))?;
    file.write_all(UTF8_BOM).map_err(|e| IoError::write(path, e))?;

    let mut writer = csv::WriterBuilder::new().from_writer(file);
    writer
        .write_record(table.columns())
        .map_err(|e| IoError::write(path, e))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|c| c.to_string()))
            .map_err(|e| IoError::write(path, e))?;
    }

    writer.flush().map_err(|e| IoError::write(path, e))?;
    Ok(())
}
