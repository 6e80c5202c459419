// Remove main-table rows whose comparison value appears in any reference table.

use std::collections::HashSet;

use crate::error::EngineError;
use crate::table::Table;

/// Trimmed, non-missing text values drawn from reference comparison columns.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    values: HashSet<String>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every value of `column` in `table`; returns how many values that column held.
    pub fn extend_from(&mut self, table: &Table, column: &str) -> Result<usize, EngineError> {
        let values = reference_values(table, column)?;
        let n = values.len();
        self.values.extend(values);
        Ok(n)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Distinct trimmed values of `column`, skipping missing cells.
pub fn reference_values(table: &Table, column: &str) -> Result<HashSet<String>, EngineError> {
    let idx = column_position(table, column)?;
    Ok(table.column(idx).filter_map(|c| c.trimmed_text()).collect())
}

#[derive(Debug, Clone)]
pub struct DedupeOutcome {
    pub table: Table,
    pub removed: usize,
    pub kept: usize,
}

/// Drop rows of `main` whose trimmed `column` value is in `references`.
/// Missing values are never duplicates. Row order is preserved.
pub fn dedupe(main: &Table, column: &str, references: &ReferenceSet) -> Result<DedupeOutcome, EngineError> {
    let idx = column_position(main, column)?;

    let mut table = main.clone();
    let removed = table.retain_rows(|row| match row[idx].trimmed_text() {
        Some(value) => !references.contains(&value),
        None => true,
    });
    let kept = table.row_count();
    log::info!("dedupe on '{}': removed {}, kept {}", column, removed, kept);

    Ok(DedupeOutcome { table, removed, kept })
}

fn column_position(table: &Table, column: &str) -> Result<usize, EngineError> {
    table.column_index(column).ok_or_else(|| EngineError::UnknownColumn {
        reference: column.to_string(),
        available: table.columns().to_vec(),
    })
}
