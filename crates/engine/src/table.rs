// In-memory table: ordered named columns over equal-width rows.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One loaded value. `Empty` is the missing marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Text cell, or `Empty` for the empty string.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Missing, empty, or whitespace-only.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }

    /// Trimmed text form, `None` when the cell is missing.
    pub fn trimmed_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Same value rendered as `Text` (missing stays missing).
    pub fn into_text(self) -> Self {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Text(s) => Cell::Text(s),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => {
                // Integers without decimals
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Cell::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Ordered source → output column names. Identity unless replaced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnMapping {
    pairs: Vec<(String, String)>,
}

impl ColumnMapping {
    pub fn identity(columns: &[String]) -> Self {
        Self {
            pairs: columns.iter().map(|c| (c.clone(), c.clone())).collect(),
        }
    }

    /// Pair each column with its replacement; a blank replacement keeps the original name.
    pub fn with_replacements(columns: &[String], replacements: &[String]) -> Self {
        let pairs = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let new = replacements.get(i).map(|r| r.trim()).unwrap_or("");
                let target = if new.is_empty() { col.clone() } else { new.to_string() };
                (col.clone(), target)
            })
            .collect();
        Self { pairs }
    }

    pub fn targets(&self) -> Vec<String> {
        self.pairs.iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn target_of(&self, source: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_str())
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, EngineError> {
        let expected = columns.len();
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(EngineError::RaggedRow { row: row + 1, found: r.len(), expected });
        }
        Ok(Self { columns, rows })
    }

    /// Table with a header and no rows.
    pub fn empty(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |r| r.get(index))
    }

    /// Project onto `selected`; names this table lacks become `Empty` columns.
    pub fn reindex(&self, selected: &[String]) -> Table {
        let sources: Vec<Option<usize>> = selected.iter().map(|c| self.column_index(c)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                sources
                    .iter()
                    .map(|src| src.map(|i| row[i].clone()).unwrap_or_default())
                    .collect()
            })
            .collect();
        Table { columns: selected.to_vec(), rows }
    }

    /// Project onto existing columns only.
    pub fn select(&self, selected: &[String]) -> Result<Table, EngineError> {
        if let Some(missing) = selected.iter().find(|c| self.column_index(c).is_none()) {
            return Err(EngineError::UnknownColumn {
                reference: missing.clone(),
                available: self.columns.clone(),
            });
        }
        Ok(self.reindex(selected))
    }

    pub fn rename(&mut self, mapping: &ColumnMapping) {
        for col in &mut self.columns {
            if let Some(target) = mapping.target_of(col) {
                *col = target.to_string();
            }
        }
    }

    /// Rows in `range` (zero-based, half-open), clamped to the table.
    pub fn slice(&self, range: Range<usize>) -> Table {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        Table {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    /// Keep rows matching `keep`; returns how many were removed.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&[Cell]) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|r| keep(r));
        before - self.rows.len()
    }

    /// Concatenate `other` below this table. Both must share the same columns.
    pub fn append(&mut self, other: Table) -> Result<(), EngineError> {
        if other.columns != self.columns {
            return Err(EngineError::ColumnMismatch);
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Apply `f` to every cell; the shape is unchanged.
    pub fn map_cells<F>(self, mut f: F) -> Table
    where
        F: FnMut(Cell) -> Cell,
    {
        let rows = self
            .rows
            .into_iter()
            .map(|r| r.into_iter().map(&mut f).collect())
            .collect();
        Table { columns: self.columns, rows }
    }

    /// Every non-missing cell rendered as text.
    pub fn into_text(self) -> Table {
        self.map_cells(Cell::into_text)
    }
}

/// Make raw header cells usable as column names: blanks become
/// `Unnamed: <i>`, repeats get a `.1`, `.2`, ... suffix.
pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, name) in raw.iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.clone()
        };

        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{base}.{count}");
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }

    out
}
