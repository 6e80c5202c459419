// Excel import/export (xlsx, xls via calamine; xlsx via rust_xlsxwriter)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use xlsel_engine::table::normalize_headers;
use xlsel_engine::{Cell, Table};

use crate::error::IoError;

/// Largest worksheet rust_xlsxwriter accepts.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Sheet names in workbook order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, IoError> {
    let workbook = open_workbook_auto(path)
        .map_err(|e| IoError::read(path, format!("failed to open Excel file: {}", e)))?;
    Ok(workbook.sheet_names().to_vec())
}

/// One loaded worksheet.
#[derive(Debug, Clone)]
pub struct XlsxData {
    pub table: Table,
    /// Every sheet in the workbook, in order.
    pub sheet_names: Vec<String>,
    /// The sheet that was loaded.
    pub sheet: String,
}

/// Load one sheet (default: first).
pub fn import(path: &Path, sheet: Option<&str>) -> Result<XlsxData, IoError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| IoError::read(path, format!("failed to open Excel file: {}", e)))?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(s) => s.to_string(),
        None => names.first().cloned().ok_or_else(|| IoError::NoSheets(path.to_path_buf()))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| IoError::read(path, format!("failed to read sheet '{}': {}", name, e)))?;

    let table = range_to_table(&range).map_err(|e| IoError::read(path, e))?;
    log::debug!(
        "loaded sheet '{}' of {}: {} rows x {} columns",
        name,
        path.display(),
        table.row_count(),
        table.column_count()
    );

    Ok(XlsxData { table, sheet_names: names, sheet: name })
}

/// First row of the sheet is the header; the rest are data rows.
///
/// calamine starts the range at the first used cell, so leading blank rows
/// and columns are padded back in to keep column 0 at sheet column A.
fn range_to_table(range: &Range<Data>) -> Result<Table, String> {
    let (top, left) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Ok(Table::default()),
    };
    let width = left + range.width();

    let mut rows = std::iter::repeat_with(|| vec![Cell::Empty; width])
        .take(top)
        .chain(range.rows().map(|cells| {
            std::iter::repeat(Cell::Empty)
                .take(left)
                .chain(cells.iter().map(data_to_cell))
                .collect::<Vec<Cell>>()
        }));

    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(Cell::to_string).collect(),
        None => return Ok(Table::default()),
    };
    let columns = normalize_headers(&header);

    let data: Vec<Vec<Cell>> = rows.collect();
    Table::new(columns, data).map_err(|e| e.to_string())
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Text(e.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Cell::Text(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
    }
}

/// Write `table` to a single-sheet workbook.
pub fn export(table: &Table, path: &Path, sheet_name: &str) -> Result<(), IoError> {
    if table.row_count() + 1 > MAX_ROWS || table.column_count() > MAX_COLS {
        return Err(IoError::write(
            path,
            format!(
                "{} rows x {} columns exceeds the Excel sheet limit",
                table.row_count(),
                table.column_count()
            ),
        ));
    }

    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| IoError::write(path, format!("failed to create sheet '{}': {}", sheet_name, e)))?;

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name)
            .map_err(|e| IoError::write(path, e))?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let xr = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let xc = c as u16;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Text(s) => worksheet.write_string(xr, xc, s),
                Cell::Number(n) => worksheet.write_number(xr, xc, *n),
                Cell::Bool(b) => worksheet.write_boolean(xr, xc, *b),
            };
            written.map_err(|e| IoError::write(path, e))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| IoError::write(path, format!("failed to save XLSX file: {}", e)))?;
    Ok(())
}
