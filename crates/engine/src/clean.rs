// Drop rows with a blank value in any of the designated columns.

use crate::error::EngineError;
use crate::table::{Cell, Table};

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: Table,
    pub before: usize,
    pub after: usize,
}

impl CleanOutcome {
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

/// Keep a row iff every column in `columns` is present and non-blank after trimming.
pub fn clean(table: &Table, columns: &[String]) -> Result<CleanOutcome, EngineError> {
    let indices = columns
        .iter()
        .map(|c| {
            table.column_index(c).ok_or_else(|| EngineError::UnknownColumn {
                reference: c.clone(),
                available: table.columns().to_vec(),
            })
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let before = table.row_count();
    let mut cleaned = table.clone();
    cleaned.retain_rows(|row| indices.iter().all(|&i| !row[i].is_blank()));
    let after = cleaned.row_count();
    log::info!("clean on {:?}: {} -> {} rows", columns, before, after);

    Ok(CleanOutcome { table: cleaned, before, after })
}

/// True when every cell of `row` is blank.
pub fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(rows: &[&[&str]]) -> Table {
        Table::new(
            vec!["name".into(), "email".into(), "note".into()],
            rows.iter().map(|r| r.iter().map(|v| Cell::text(*v)).collect()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_row_with_one_blank_designated_column_dropped() {
        let table = t(&[&["Ann", "a@x", ""], &["Bob", "   ", "full"], &["", "c@x", "n"]]);
        let out = clean(&table, &["name".to_string(), "email".to_string()]).unwrap();
        assert_eq!(out.before, 3);
        assert_eq!(out.after, 1);
        assert_eq!(out.removed(), 2);
        assert_eq!(out.table.rows()[0][0], Cell::text("Ann"));
    }

    #[test]
    fn test_undesignated_blanks_ignored() {
        let table = t(&[&["Ann", "a@x", ""]]);
        let out = clean(&table, &["name".to_string()]).unwrap();
        assert_eq!(out.after, 1);
    }

    #[test]
    fn test_unknown_column() {
        assert!(clean(&t(&[]), &["zip".to_string()]).is_err());
    }

    #[test]
    fn test_is_blank_row() {
        assert!(is_blank_row(&[Cell::Empty, Cell::text(" ")]));
        assert!(!is_blank_row(&[Cell::Empty, Cell::Number(0.0)]));
    }
}
