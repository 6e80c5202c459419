// Merge flow: pick inputs, columns, renames and blank-row policy, then write one file.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use console::style;
use xlsel_engine::merge::{column_sets, merge, select_columns, ColumnPolicy, MergePlan};
use xlsel_engine::table::ColumnMapping;
use xlsel_engine::{ColumnRef, Table};
use xlsel_io::inputs::{resolve_directory, resolve_files, sort_paths, split_path_list};
use xlsel_io::write::ensure_extension;
use xlsel_io::{load, save, FileKind, OutputFormat};

use crate::prompt::Prompter;
use crate::util::{banner, describe, file_label};
use crate::{CliError, Context};

pub fn run<R: BufRead, W: Write>(p: &mut Prompter<R, W>, ctx: &Context) -> Result<(), CliError> {
    banner(p, "Merge CSV/XLSX files")?;
    let settings = &ctx.settings.merge;

    // 1. inputs
    let mut files = pick_inputs(p)?;
    if p.yes_no("Sort by file name?", settings.sort_inputs)? {
        sort_paths(&mut files);
    }

    // 2. read
    p.say("")?;
    p.say("Reading files...")?;
    let mut sources: Vec<(String, Table)> = Vec::new();
    for path in &files {
        match load(path, None, &ctx.load) {
            Ok(loaded) => {
                let label = file_label(path);
                match (loaded.encoding.as_deref(), loaded.line_count) {
                    (Some(enc), Some(lines)) => p.say(format!(
                        "  {} {}: encoding {}, {} lines incl. header, {}",
                        style("ok").green(),
                        label,
                        enc,
                        lines,
                        describe(&loaded.table)
                    ))?,
                    _ => p.say(format!(
                        "  {} {} [{}]: ~{} lines incl. header, {}",
                        style("ok").green(),
                        label,
                        loaded.sheet,
                        loaded.table.row_count() + 1,
                        describe(&loaded.table)
                    ))?,
                }
                sources.push((path.display().to_string(), loaded.table));
            }
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                p.say(format!("  {} {}: {}", style("failed").red(), file_label(path), e))?;
            }
        }
    }
    if sources.is_empty() {
        return Err(CliError::op("no input file could be read"));
    }

    // 3. columns
    let sets = column_sets(sources.iter().map(|(_, t)| t));
    p.say("")?;
    p.say(format!("Columns seen in any file ({}): {:?}", sets.union.len(), sets.union))?;
    p.say(format!("Columns shared by all files ({}): {:?}", sets.intersection.len(), sets.intersection))?;

    let common_only = p.yes_no("Keep only the shared columns?", false)?;
    let policy = if common_only && !sets.intersection.is_empty() {
        ColumnPolicy::Common
    } else {
        if common_only {
            p.say(style("No column is shared by every file.").yellow())?;
        }
        let answer = p.ask("Columns to keep (comma separated, blank = all): ")?;
        if answer.is_empty() {
            ColumnPolicy::All
        } else {
            ColumnPolicy::Include(include_list(&answer, &sets.union))
        }
    };
    let selected = select_columns(&policy, &sets)?;
    p.say(format!("Output columns: {:?}", selected))?;

    // 4. rename
    let mapping = if p.yes_no("Rename output columns?", false)? {
        p.say("New name for each column (blank keeps the current name):")?;
        let mut replacements = Vec::with_capacity(selected.len());
        for col in &selected {
            replacements.push(p.ask(&format!("  rename '{}' to: ", col))?);
        }
        ColumnMapping::with_replacements(&selected, &replacements)
    } else {
        ColumnMapping::identity(&selected)
    };

    // 5. blank rows
    p.say("")?;
    p.say("Drop rows whose cells are all empty (or whitespace only)?")?;
    let drop_blank_rows = p.yes_no("Drop them?", settings.drop_blank_rows)?;

    // 6. merge
    let plan = MergePlan { columns: selected, mapping, drop_blank_rows };
    p.say("")?;
    p.say("Merging...")?;
    let outcome = merge(&sources, &plan)?;
    for report in &outcome.sources {
        p.say(format!("  merged {} -> {} rows", file_label(Path::new(&report.label)), report.kept))?;
    }
    p.say(format!("Merge complete: {} rows.", outcome.merged_rows))?;
    if outcome.dropped_rows() > 0 {
        p.say(style(format!(
            "Note: merged {} rows, expected {}; {} blank rows were dropped.",
            outcome.merged_rows,
            outcome.expected_rows,
            outcome.dropped_rows()
        ))
        .yellow())?;
    } else {
        p.say("Row count matches the inputs.")?;
    }

    // 7. output
    let format = match p.choice("Output format: 1) CSV  2) XLSX (default 1): ", &["1", "2"], Some("1"))?.as_str() {
        "2" => OutputFormat::Xlsx,
        _ => OutputFormat::Csv,
    };
    let raw = p.ask_path("Output file path (with file name): ")?;
    let output = output_path(&raw, &settings.output_name, format);

    save(&outcome.table, &output, &settings.sheet_name)?;
    p.say(style(format!("Saved: {}", output.display())).green())?;
    p.say(format!(
        "Output has {} lines incl. header ({} data rows).",
        outcome.table.row_count() + 1,
        outcome.table.row_count()
    ))
}

fn pick_inputs<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Vec<PathBuf>, CliError> {
    let mode = p.choice(
        "Input: 1) file paths (space separated)  2) a whole folder (default 2): ",
        &["1", "2"],
        Some("2"),
    )?;

    if mode == "1" {
        let paths = split_path_list(&p.ask("File paths (space separated): ")?, None);
        if paths.is_empty() {
            return Err(CliError::op("no file paths entered"));
        }
        return Ok(resolve_files(&paths, false)?);
    }

    let raw = p.ask_path("Folder path (blank = current folder): ")?;
    let dir = PathBuf::from(if raw.is_empty() { "." } else { raw.as_str() });
    let files = resolve_directory(&dir, false)?;
    p.say(format!("Found {} file(s):", files.len()))?;
    for (i, f) in files.iter().enumerate() {
        p.say(format!("  {}. {}", i + 1, f.display()))?;
    }
    Ok(files)
}

/// Resolve each entry against the union (name, number, or letter). Entries
/// that resolve to nothing are passed through for `select_columns` to skip.
fn include_list(answer: &str, union: &[String]) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            ColumnRef::parse(entry)
                .and_then(|r| r.resolve_index(union))
                .map(|i| union[i].clone())
                .unwrap_or_else(|_| entry.to_string())
        })
        .collect()
}

/// Blank = default name; a name without `.csv`/`.xlsx` gets the chosen extension.
fn output_path(raw: &str, default_name: &str, format: OutputFormat) -> PathBuf {
    if raw.is_empty() {
        return ensure_extension(default_name, format);
    }
    let has_output_ext = OutputFormat::from_path(Path::new(raw)).is_ok();
    let is_xls = FileKind::from_path(Path::new(raw)) == Some(FileKind::Xls);
    if has_output_ext || is_xls {
        // .xls is kept so the writer reports it instead of silently renaming
        PathBuf::from(raw)
    } else {
        ensure_extension(raw, format)
    }
}
