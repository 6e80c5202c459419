// Merge many loaded tables into one.
// Pure functions: tables in, one table plus per-source counts out.

use std::collections::BTreeSet;

use crate::clean::is_blank_row;
use crate::error::EngineError;
use crate::table::{Cell, ColumnMapping, Table};

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// Which columns the merged output carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPolicy {
    /// Only columns present in every source.
    Common,
    /// Every column seen in any source.
    All,
    /// Explicit list, in the order given. Names absent from every source are skipped.
    Include(Vec<String>),
}

/// Union and intersection of source headers, each sorted lexically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSets {
    pub union: Vec<String>,
    pub intersection: Vec<String>,
}

pub fn column_sets<'a, I>(tables: I) -> ColumnSets
where
    I: IntoIterator<Item = &'a Table>,
{
    let mut union: BTreeSet<&str> = BTreeSet::new();
    let mut common: Option<BTreeSet<&str>> = None;

    for table in tables {
        let cols: BTreeSet<&str> = table.columns().iter().map(String::as_str).collect();
        union.extend(cols.iter().copied());
        common = Some(match common {
            None => cols,
            Some(prev) => prev.intersection(&cols).copied().collect(),
        });
    }

    ColumnSets {
        union: union.into_iter().map(str::to_string).collect(),
        intersection: common
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

pub fn select_columns(policy: &ColumnPolicy, sets: &ColumnSets) -> Result<Vec<String>, EngineError> {
    let selected: Vec<String> = match policy {
        ColumnPolicy::Common => sets.intersection.clone(),
        ColumnPolicy::All => sets.union.clone(),
        ColumnPolicy::Include(wanted) => {
            let mut kept: Vec<String> = Vec::new();
            for name in wanted {
                if !sets.union.contains(name) {
                    log::warn!("column '{}' is not present in any input, skipping", name);
                } else if !kept.contains(name) {
                    kept.push(name.clone());
                }
            }
            kept
        }
    };

    if selected.is_empty() {
        return Err(EngineError::EmptySelection);
    }
    Ok(selected)
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Source column names, in output order.
    pub columns: Vec<String>,
    /// Output names for `columns`.
    pub mapping: ColumnMapping,
    /// Drop rows whose cells are all missing or whitespace.
    pub drop_blank_rows: bool,
}

impl MergePlan {
    pub fn new(columns: Vec<String>) -> Self {
        let mapping = ColumnMapping::identity(&columns);
        Self { columns, mapping, drop_blank_rows: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub label: String,
    pub rows: usize,
    pub kept: usize,
}

impl SourceReport {
    pub fn dropped(&self) -> usize {
        self.rows - self.kept
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub table: Table,
    pub sources: Vec<SourceReport>,
    /// Sum of source data rows before blank-row removal.
    pub expected_rows: usize,
    pub merged_rows: usize,
}

impl MergeOutcome {
    pub fn dropped_rows(&self) -> usize {
        self.expected_rows - self.merged_rows
    }
}

/// Reindex every source onto the plan's columns, rename, optionally drop
/// blank rows, and concatenate in source order.
pub fn merge(sources: &[(String, Table)], plan: &MergePlan) -> Result<MergeOutcome, EngineError> {
    let mut combined = Table::empty(plan.mapping.targets());
    let mut reports = Vec::with_capacity(sources.len());
    let mut expected_rows = 0;

    for (label, source) in sources {
        let mut part = source.reindex(&plan.columns);
        part.rename(&plan.mapping);

        if plan.drop_blank_rows {
            part = blank_whitespace(part);
            part.retain_rows(|row| !is_blank_row(row));
        }

        expected_rows += source.row_count();
        reports.push(SourceReport {
            label: label.clone(),
            rows: source.row_count(),
            kept: part.row_count(),
        });
        log::debug!("merged {}: {} of {} rows", label, part.row_count(), source.row_count());

        combined.append(part)?;
    }

    let merged_rows = combined.row_count();
    log::info!("merged {} sources into {} rows", sources.len(), merged_rows);

    Ok(MergeOutcome { table: combined, sources: reports, expected_rows, merged_rows })
}

/// Whitespace-only text counts as missing once blank-row cleanup is on.
fn blank_whitespace(table: Table) -> Table {
    table.map_cells(|c| if c.is_blank() { Cell::Empty } else { c })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    fn t(cols: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            s(cols),
            rows.iter().map(|r| r.iter().map(|v| Cell::text(*v)).collect()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_column_sets() {
        let a = t(&["b", "a", "c"], &[]);
        let b = t(&["c", "b", "d"], &[]);
        let sets = column_sets([&a, &b]);
        assert_eq!(sets.union, s(&["a", "b", "c", "d"]));
        assert_eq!(sets.intersection, s(&["b", "c"]));
    }

    #[test]
    fn test_select_include_skips_unknown() {
        let sets = ColumnSets { union: s(&["a", "b"]), intersection: s(&["a"]) };
        let got = select_columns(&ColumnPolicy::Include(s(&["b", "zz", "a"])), &sets).unwrap();
        assert_eq!(got, s(&["b", "a"]));
        assert_eq!(
            select_columns(&ColumnPolicy::Include(s(&["zz"])), &sets),
            Err(EngineError::EmptySelection)
        );
    }

    #[test]
    fn test_select_common_empty_is_error() {
        let sets = ColumnSets { union: s(&["a", "b"]), intersection: vec![] };
        assert_eq!(select_columns(&ColumnPolicy::Common, &sets), Err(EngineError::EmptySelection));
    }

    #[test]
    fn test_merge_reindexes_and_drops_blank_rows() {
        let a = t(&["id", "name"], &[&["1", "Ann"], &["", "  "], &["2", ""]]);
        let b = t(&["id", "city"], &[&["3", "Oslo"]]);
        let sources = vec![("a.csv".to_string(), a), ("b.csv".to_string(), b)];

        let plan = MergePlan::new(s(&["id", "name"]));
        let out = merge(&sources, &plan).unwrap();

        assert_eq!(out.expected_rows, 4);
        assert_eq!(out.merged_rows, 3);
        assert_eq!(out.dropped_rows(), 1);
        assert_eq!(out.sources[0].dropped(), 1);
        assert_eq!(out.table.rows()[2], vec![Cell::text("3"), Cell::Empty]);
    }

    #[test]
    fn test_merge_keeps_blank_rows_when_disabled() {
        let a = t(&["id"], &[&["1"], &[""], &["   "]]);
        let mut plan = MergePlan::new(s(&["id"]));
        plan.drop_blank_rows = false;
        let out = merge(&[("a".to_string(), a)], &plan).unwrap();
        assert_eq!(out.merged_rows, 3);
        assert_eq!(out.table.rows()[2], vec![Cell::text("   ")]);
    }

    #[test]
    fn test_merge_renames() {
        let a = t(&["id", "name"], &[&["1", "Ann"]]);
        let mut plan = MergePlan::new(s(&["name", "id"]));
        plan.mapping = ColumnMapping::with_replacements(&plan.columns, &s(&["Full Name", ""]));
        let out = merge(&[("a".to_string(), a)], &plan).unwrap();
        assert_eq!(out.table.columns(), &s(&["Full Name", "id"])[..]);
        assert_eq!(out.table.rows()[0], vec![Cell::text("Ann"), Cell::text("1")]);
    }
}
