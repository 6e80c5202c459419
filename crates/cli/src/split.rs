// Split flow: one input, optional column subset and renames, then chunk or segment files.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use console::style;
use xlsel_engine::column::resolve_list;
use xlsel_engine::split::{part_file_name, split, SplitPlan};
use xlsel_engine::table::ColumnMapping;
use xlsel_engine::Table;
use xlsel_io::{save, FileKind, OutputFormat};

use crate::prompt::Prompter;
use crate::util::{banner, describe, load_with_sheet_prompt, output_dir_prompt, quoted_list};
use crate::{CliError, Context};

pub fn run<R: BufRead, W: Write>(p: &mut Prompter<R, W>, ctx: &Context) -> Result<(), CliError> {
    banner(p, "Split a CSV/XLSX file")?;

    let path = ask_input_file(p)?;
    let loaded = load_with_sheet_prompt(p, &path, &ctx.load)?;
    p.say(format!("Loaded {}", describe(&loaded.table)))?;
    let table = pick_columns(p, loaded.table)?;

    let total = table.row_count();
    if total == 0 {
        return Err(CliError::op("the file has no data rows to split"));
    }

    let plan = ask_plan(p, total)?;
    let parts = split(&table, &plan)?;
    if parts.is_empty() {
        p.say("No rows selected, nothing to write.")?;
        return Ok(());
    }
    p.say(format!("{} part(s) ready.", parts.len()))?;

    let Some(dir) = output_dir_prompt(p, "Output folder (blank = current folder): ", false)? else {
        return Ok(());
    };
    let prefix = match p.ask("File name prefix (blank = default): ")? {
        s if s.is_empty() => ctx.settings.split.prefix.clone(),
        s => s,
    };
    let format = match p.choice("Output format (csv/xlsx): ", &["csv", "xlsx"], None)?.as_str() {
        "xlsx" => OutputFormat::Xlsx,
        _ => OutputFormat::Csv,
    };

    for (i, part) in parts.iter().enumerate() {
        let out = dir.join(part_file_name(&prefix, i + 1, format.extension()));
        save(part, &out, &ctx.settings.output.sheet_name)?;
        p.say(format!("  saved {} ({} rows)", out.display(), part.row_count()))?;
    }
    p.say(style("All parts written.").green())
}

/// Re-prompt until the path exists and is a supported table file.
fn ask_input_file<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<PathBuf, CliError> {
    loop {
        let path = PathBuf::from(p.ask_path("CSV or Excel file to split: ")?);
        if !path.exists() {
            p.say("File not found, try again.")?;
        } else if FileKind::from_path(&path).is_none() {
            p.say("Unsupported format, use a .csv, .xlsx or .xls file.")?;
        } else {
            return Ok(path);
        }
    }
}

fn pick_columns<R: BufRead, W: Write>(p: &mut Prompter<R, W>, table: Table) -> Result<Table, CliError> {
    p.say("")?;
    p.say(format!("Columns: {}", quoted_list(table.columns())))?;

    let selected = loop {
        let answer = p.ask("Columns to keep (names, numbers or letters, comma separated; blank = all): ")?;
        if answer.is_empty() {
            break table.columns().to_vec();
        }
        match resolve_list(&answer, &table) {
            Ok(cols) => break cols,
            Err(e) => p.say(style(format!("{}, try again.", e)).yellow())?,
        }
    };

    let mut projected = table.select(&selected)?;
    if p.yes_no("Rename these columns?", false)? {
        let mut replacements = Vec::with_capacity(selected.len());
        for col in &selected {
            replacements.push(p.ask(&format!("  new name for '{}': ", col))?);
        }
        let mapping = ColumnMapping::with_replacements(&selected, &replacements);
        projected.rename(&mapping);
        p.say(format!("Columns are now: {}", quoted_list(projected.columns())))?;
    }
    Ok(projected)
}

fn ask_plan<R: BufRead, W: Write>(p: &mut Prompter<R, W>, total: usize) -> Result<SplitPlan, CliError> {
    p.say("")?;
    p.say("Split mode:")?;
    p.say("  1. fixed-size chunks (optionally only the first N chunks)")?;
    p.say("  2. a row range cut into equal segments")?;
    let mode = p.choice("Choose (1/2): ", &["1", "2"], None)?;

    p.say(format!("The file has {} data rows.", total))?;
    let start = p.int_in_range("Start row (1-based): ", 1, total)?;

    if mode == "1" {
        let end = p
            .optional_int("End row, exclusive (blank = to the last row): ", start + 1, total + 1)?
            .unwrap_or(total + 1);
        let chunk_size = p.positive_int("Rows per chunk: ")?;
        let max_chunks = p.optional_int("How many chunks (blank = until the range ends): ", 1, usize::MAX)?;
        return Ok(SplitPlan::Chunks { start, end, chunk_size, max_chunks });
    }

    let end = p.int_in_range("End row, exclusive (1-based): ", start + 1, total + 1)?;
    let segments = p.positive_int("Number of segments: ")?;
    Ok(SplitPlan::Segments { start, end, segments })
}
