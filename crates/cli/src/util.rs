// Helpers shared by the operation flows.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use console::style;
use xlsel_engine::sheet::select_sheet;
use xlsel_engine::Table;
use xlsel_io::load::{list_sheets, load, Loaded};
use xlsel_io::{FileKind, LoadOptions};

use crate::prompt::Prompter;
use crate::CliError;

pub const RULE: &str = "========================================";

pub fn banner<R: BufRead, W: Write>(p: &mut Prompter<R, W>, title: &str) -> Result<(), CliError> {
    p.say("")?;
    p.say(RULE)?;
    p.say(style(format!("=== {} ===", title)).bold())?;
    p.say(RULE)?;
    p.say("")
}

/// `'a', 'b', 'c'`
pub fn quoted_list(names: &[String]) -> String {
    names.iter().map(|n| format!("'{}'", n)).collect::<Vec<_>>().join(", ")
}

pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// List the sheets of `path`, let the operator pick one, and load it.
/// CSV files skip the question.
pub fn load_with_sheet_prompt<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    path: &Path,
    options: &LoadOptions,
) -> Result<Loaded, CliError> {
    let is_workbook = FileKind::from_path(path).is_some_and(|k| k.is_spreadsheet());
    if !is_workbook {
        return Ok(load(path, None, options)?);
    }

    let names = list_sheets(path)?;
    p.say(format!("Found {} sheet(s): {}", names.len(), quoted_list(&names)))?;

    let sheet = if names.len() == 1 {
        names[0].clone()
    } else {
        p.say(format!("Press Enter for the default [{}]", names[0]))?;
        let answer = p.ask("Choose a sheet (number or name): ")?;
        let choice = select_sheet(&names, &answer).ok_or_else(|| CliError::op(format!("{} has no sheets", path.display())))?;
        if let Some(why) = &choice.fallback {
            p.say(style(why).yellow())?;
        }
        choice.name
    };

    Ok(load(path, Some(&sheet), options)?)
}

/// Ask for an output directory (blank = current). Missing directories are
/// created, after confirmation when `confirm` is set. `None` = operator declined.
pub fn output_dir_prompt<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    prompt: &str,
    confirm: bool,
) -> Result<Option<PathBuf>, CliError> {
    let raw = p.ask_path(prompt)?;
    let dir = PathBuf::from(if raw.is_empty() { "." } else { raw.as_str() });

    if dir.is_dir() {
        return Ok(Some(dir));
    }
    if dir.exists() {
        return Err(CliError::op(format!("not a directory: {}", dir.display())));
    }
    if confirm && !p.yes_no("Directory does not exist, create it?", false)? {
        p.say("Cancelled: directory not created.")?;
        return Ok(None);
    }

    fs::create_dir_all(&dir)
        .map_err(|e| CliError::op(format!("cannot create directory {}: {}", dir.display(), e)))?;
    p.say(format!("Created directory: {}", dir.display()))?;
    Ok(Some(dir))
}

pub fn describe(table: &Table) -> String {
    format!("{} data rows, {} columns", table.row_count(), table.column_count())
}
