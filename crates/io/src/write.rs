// Table Writer: persist one table as CSV or XLSX, chosen by extension.

use std::fs;
use std::path::{Path, PathBuf};

use xlsel_engine::Table;

use crate::error::IoError;
use crate::{csv, xlsx};

/// Output formats. Legacy `.xls` is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(IoError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Append `.ext` unless the name already ends with it (case-insensitive).
pub fn ensure_extension(name: &str, format: OutputFormat) -> PathBuf {
    let ext = format.extension();
    let has = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    if has {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{}.{}", name, ext))
    }
}

/// Write `table` to `path`. `sheet_name` applies to XLSX only.
/// Missing parent directories are created.
pub fn save(table: &Table, path: &Path, sheet_name: &str) -> Result<(), IoError> {
    let format = OutputFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IoError::write(path, e))?;
    }

    match format {
        OutputFormat::Csv => csv::export(table, path)?,
        OutputFormat::Xlsx => xlsx::export(table, path, sheet_name)?,
    }

    log::info!("wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}
