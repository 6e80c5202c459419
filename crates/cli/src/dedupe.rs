// Dedupe flow: drop rows of a main file whose key appears in any reference file.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use console::style;
use xlsel_engine::dedupe::{dedupe, reference_values, ReferenceSet};
use xlsel_engine::{ColumnRef, Table};
use xlsel_io::inputs::{clean_path, partition_existing, split_path_list};
use xlsel_io::write::ensure_extension;
use xlsel_io::{save, OutputFormat};

use crate::prompt::Prompter;
use crate::util::{banner, file_label, load_with_sheet_prompt, quoted_list};
use crate::{CliError, Context};

pub fn run<R: BufRead, W: Write>(p: &mut Prompter<R, W>, ctx: &Context) -> Result<(), CliError> {
    banner(p, "Remove rows found in reference files")?;

    // 1. main file
    let main_path = PathBuf::from(p.ask_path("Main file (rows are removed from it): ")?);
    if !main_path.exists() {
        return Err(CliError::op(format!("file not found: {}", main_path.display())));
    }
    let loaded = load_with_sheet_prompt(p, &main_path, &ctx.load)?;
    let main = loaded.table.into_text();
    p.say(format!("Columns of '{}': {}", loaded.sheet, quoted_list(main.columns())))?;

    let main_column = ask_column(p, &main, "Comparison column in the main file: ")?
        .ok_or_else(|| CliError::op("the column name cannot be empty"))?;

    // 2. reference files
    let refs = ask_reference_paths(p)?;
    let (existing, missing) = partition_existing(&refs);
    for m in &missing {
        p.say(style(format!("Skipping missing file: {}", m.display())).yellow())?;
    }
    if existing.is_empty() {
        return Err(CliError::op("no valid reference files"));
    }

    // 3. per-reference sheet and column
    p.say("")?;
    p.say("Choose the sheet and comparison column of each reference file:")?;
    let mut reference_set = ReferenceSet::new();
    let mut configured = 0;
    for path in &existing {
        p.say(format!("--- {} ---", file_label(path)))?;
        match add_reference(p, ctx, path, &mut reference_set)? {
            Some(added) => {
                configured += 1;
                p.say(format!("Added {} values, {} in total.", added, reference_set.len()))?;
            }
            None => p.say("Skipped.")?,
        }
    }
    if configured == 0 {
        return Err(CliError::op("no reference file was configured"));
    }
    if reference_set.is_empty() {
        p.say(style("The reference columns hold no values; nothing will be removed.").yellow())?;
    }

    // 4. filter
    p.say("")?;
    let unique = reference_values(&main, &main_column)?.len();
    p.say(format!("Main column '{}' holds {} distinct values.", main_column, unique))?;
    p.say(format!("Checking against {} reference values...", reference_set.len()))?;
    let outcome = dedupe(&main, &main_column, &reference_set)?;
    p.say(style(format!("Done: removed {} rows, {} remain.", outcome.removed, outcome.kept)).green())?;

    // 5. save
    let raw = p.ask_path("Save to (e.g. result.xlsx): ")?;
    if raw.is_empty() {
        return Err(CliError::op("no output path given"));
    }
    let output = if Path::new(&raw).extension().is_none() {
        ensure_extension(&raw, OutputFormat::Xlsx)
    } else {
        PathBuf::from(&raw)
    };
    save(&outcome.table, &output, &ctx.settings.output.sheet_name)?;
    let shown = output.canonicalize().unwrap_or_else(|_| output.clone());
    p.say(format!("Saved to:\n   {}", shown.display()))
}

/// Resolve a column reference; `None` when the answer is blank.
fn ask_column<R: BufRead, W: Write>(p: &mut Prompter<R, W>, table: &Table, prompt: &str) -> Result<Option<String>, CliError> {
    let answer = p.ask(prompt)?;
    if answer.is_empty() {
        return Ok(None);
    }
    Ok(Some(ColumnRef::parse(&answer)?.resolve(table)?))
}

/// One line separated by `;`, or one path per line ended by a blank line.
fn ask_reference_paths<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Vec<String>, CliError> {
    p.say("")?;
    p.say("Reference files (separate with ';', or one per line and a blank line to finish):")?;
    let first = p.ask("")?;
    if first.contains(';') {
        return Ok(split_path_list(&first, Some(';')));
    }

    let mut paths = Vec::new();
    let mut line = clean_path(&first);
    while !line.is_empty() {
        paths.push(line);
        line = p.ask_path("")?;
    }
    Ok(paths)
}

/// Load one reference file and add its comparison column to `set`.
/// Read and column errors skip the file; `None` = skipped.
fn add_reference<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    ctx: &Context,
    path: &Path,
    set: &mut ReferenceSet,
) -> Result<Option<usize>, CliError> {
    let table = match load_with_sheet_prompt(p, path, &ctx.load) {
        Ok(loaded) => loaded.table.into_text(),
        Err(e) if e.ends_session() => return Err(e),
        Err(e) => {
            p.say(style(format!("Read failed: {}", e.message)).red())?;
            return Ok(None);
        }
    };
    p.say(format!("Columns: {}", quoted_list(table.columns())))?;

    match ask_column(p, &table, "Comparison column: ") {
        Ok(Some(column)) => {
            let added = set.extend_from(&table, &column)?;
            log::info!("{}: {} reference values from '{}'", path.display(), added, column);
            Ok(Some(added))
        }
        Ok(None) => {
            p.say("The column cannot be empty.")?;
            Ok(None)
        }
        Err(e) if e.ends_session() => Err(e),
        Err(e) => {
            p.say(style(e.message).red())?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::tests::{output, prompter};
    use std::fs;
    use tempfile::tempdir;
    use xlsel_config::Settings;
    use xlsel_engine::Cell;
    use xlsel_io::LoadOptions;

    fn ctx() -> Context {
        Context { settings: Settings::default(), load: LoadOptions::default() }
    }

    #[test]
    fn dedupe_against_two_references() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.csv");
        let r1 = dir.path().join("r1.csv");
        let r2 = dir.path().join("r2.xlsx");
        fs::write(&main, "email,name\na@x, Ann\nb@x,Bo\n,Cy\nc@x,Di\n").unwrap();
        fs::write(&r1, "id,mail\n1, a@x \n").unwrap();
        let ref_table = Table::new(vec!["addr".to_string()], vec![vec![Cell::text("c@x")]]).unwrap();
        save(&ref_table, &r2, "Refs").unwrap();
        let out = dir.path().join("kept.csv");

        // main column by letter, refs on one line, r1 column by number, r2 by name
        let script = format!(
            "{}\nA\n{};{};{}\n2\naddr\n{}\n",
            main.display(),
            r1.display(),
            dir.path().join("gone.csv").display(),
            r2.display(),
            out.display()
        );
        let mut p = prompter(&script);
        run(&mut p, &ctx()).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.trim_start_matches('\u{feff}'), "email,name\nb@x,Bo\n,Cy\n");
        let log = output(&p);
        assert!(log.contains("Skipping missing file"));
        assert!(log.contains("removed 2 rows, 2 remain"));
    }

    #[test]
    fn blank_reference_column_removes_nothing() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.csv");
        let r1 = dir.path().join("r1.csv");
        let out = dir.path().join("out.csv");
        fs::write(&main, "k\n1\n2\n").unwrap();
        fs::write(&r1, "k,j\n,x\n,y\n").unwrap();

        let script = format!("{}\nk\n{}\n\nk\n{}\n", main.display(), r1.display(), out.display());
        let mut p = prompter(&script);
        run(&mut p, &ctx()).unwrap();

        let log = output(&p);
        assert!(log.contains("nothing will be removed"));
        assert!(log.contains("removed 0 rows, 2 remain"));
    }

    #[test]
    fn references_one_per_line() {
        let mut p = prompter("a.csv\n'b c.csv'\n\n");
        assert_eq!(ask_reference_paths(&mut p).unwrap(), vec!["a.csv", "b c.csv"]);

        let mut p = prompter("\n");
        assert!(ask_reference_paths(&mut p).unwrap().is_empty());
    }

    #[test]
    fn bad_reference_column_skips_file() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.csv");
        let r1 = dir.path().join("r1.csv");
        fs::write(&main, "k\n1\n").unwrap();
        fs::write(&r1, "k\n1\n").unwrap();

        let script = format!("{}\nk\n{}\n\nnope\n", main.display(), r1.display());
        let mut p = prompter(&script);
        let err = run(&mut p, &ctx()).unwrap_err();
        assert_eq!(err.message, "no reference file was configured");
        assert!(output(&p).contains("cannot find column 'nope'"));
    }

    #[test]
    fn main_column_required() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.csv");
        fs::write(&main, "k\n1\n").unwrap();
        let mut p = prompter(&format!("{}\n\n", main.display()));
        assert!(run(&mut p, &ctx()).is_err());
    }
}
