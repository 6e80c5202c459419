// Table Loader: detect format by extension and read one table.

use std::path::Path;

use xlsel_engine::sheet::CSV_SHEET;
use xlsel_engine::Table;

use crate::csv::{self, CsvEncoding};
use crate::error::IoError;
use crate::inputs::FileKind;
use crate::xlsx;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// CSV encodings, tried in order.
    pub encodings: Vec<CsvEncoding>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encodings: csv::default_encodings(),
        }
    }
}

/// A table plus what was learned while reading it.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Table,
    pub kind: FileKind,
    /// Workbook sheet names; CSV files report one implicit sheet.
    pub sheet_names: Vec<String>,
    pub sheet: String,
    /// CSV only: encoding that decoded the file.
    pub encoding: Option<String>,
    /// CSV only: physical lines including the header.
    pub line_count: Option<usize>,
}

/// Load `path`. `sheet` picks a workbook sheet (`None` = first); CSV ignores it.
pub fn load(path: &Path, sheet: Option<&str>, options: &LoadOptions) -> Result<Loaded, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let kind = FileKind::from_path(path).ok_or_else(|| IoError::UnsupportedFormat(path.to_path_buf()))?;

    let loaded = match kind {
        FileKind::Csv => {
            let data = csv::import(path, &options.encodings)?;
            Loaded {
                table: data.table,
                kind,
                sheet_names: vec![CSV_SHEET.to_string()],
                sheet: CSV_SHEET.to_string(),
                encoding: Some(data.encoding),
                line_count: Some(data.line_count),
            }
        }
        FileKind::Xlsx | FileKind::Xls => {
            let data = xlsx::import(path, sheet)?;
            Loaded {
                table: data.table,
                kind,
                sheet_names: data.sheet_names,
                sheet: data.sheet,
                encoding: None,
                line_count: None,
            }
        }
    };

    log::info!(
        "loaded {}: {} rows, {} columns",
        path.display(),
        loaded.table.row_count(),
        loaded.table.column_count()
    );
    Ok(loaded)
}

/// Sheet names without loading data. CSV files own one implicit sheet.
pub fn list_sheets(path: &Path) -> Result<Vec<String>, IoError> {
    match FileKind::from_path(path) {
        Some(FileKind::Csv) => Ok(vec![CSV_SHEET.to_string()]),
        Some(_) => {
            let names = xlsx::sheet_names(path)?;
            if names.is_empty() {
                return Err(IoError::NoSheets(path.to_path_buf()));
            }
            Ok(names)
        }
        None => Err(IoError::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use xlsel_engine::Cell;

    #[test]
    fn test_load_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.csv");
        fs::write(&path, "id,name\n1,Ann\n2,\n").unwrap();

        let loaded = load(&path, None, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.kind, FileKind::Csv);
        assert_eq!(loaded.sheet_names, vec!["CSV".to_string()]);
        assert_eq!(loaded.encoding.as_deref(), Some("utf-8"));
        assert_eq!(loaded.line_count, Some(3));
        assert_eq!(loaded.table.rows()[1][1], Cell::Empty);
    }

    #[test]
    fn test_load_xlsx_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.xlsx");
        let table = Table::new(vec!["k".to_string()], vec![vec![Cell::text("v")]]).unwrap();
        xlsx::export(&table, &path, "Data").unwrap();

        let loaded = load(&path, Some("Data"), &LoadOptions::default()).unwrap();
        assert_eq!(loaded.sheet, "Data");
        assert_eq!(loaded.table, table);
        assert!(loaded.encoding.is_none());
        assert_eq!(list_sheets(&path).unwrap(), vec!["Data".to_string()]);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("none.csv");
        assert!(matches!(load(&missing, None, &LoadOptions::default()), Err(IoError::NotFound(_))));

        let txt = dir.path().join("a.txt");
        fs::write(&txt, "x").unwrap();
        assert!(matches!(load(&txt, None, &LoadOptions::default()), Err(IoError::UnsupportedFormat(_))));
        assert!(matches!(list_sheets(&txt), Err(IoError::UnsupportedFormat(_))));
    }
}
