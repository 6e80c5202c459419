// Clean flow: drop rows that are blank in any of the chosen columns.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use console::style;
use xlsel_engine::clean::clean;
use xlsel_engine::column::resolve_list;
use xlsel_io::{load, save, OutputFormat};

use crate::prompt::Prompter;
use crate::util::{banner, output_dir_prompt};
use crate::{CliError, Context};

pub fn run<R: BufRead, W: Write>(p: &mut Prompter<R, W>, ctx: &Context) -> Result<(), CliError> {
    banner(p, "Drop rows with blank values in chosen columns")?;

    let raw = p.ask_path("CSV/XLSX file (paste or drag it here): ")?;
    let input = PathBuf::from(&raw);
    if raw.is_empty() || !input.exists() {
        return Err(CliError::op("the file path is empty or does not exist"));
    }
    let table = load(&input, None, &ctx.load)?.table.into_text();

    if table.column_count() == 0 {
        p.say(style("The file has no columns.").yellow())?;
        return Ok(());
    }

    p.say("")?;
    p.say("Columns in the file:")?;
    for (i, col) in table.columns().iter().enumerate() {
        p.say(format!("  {:2}. {}", i + 1, col))?;
    }

    p.say("")?;
    p.say("Columns that must not be blank:")?;
    p.say("  - names, comma separated, e.g. Email,Name")?;
    p.say("  - or numbers, e.g. 1,3,5")?;
    let answer = p.ask("> ")?;
    if answer.is_empty() {
        return Err(CliError::op("no columns entered"));
    }
    let columns = resolve_list(&answer, &table)?;
    p.say(format!("Checking blanks in: {:?}", columns))?;

    let Some(dir) = output_dir_prompt(p, "Output folder (blank = current folder): ", true)? else {
        return Ok(());
    };
    let name = p.ask_path("Output file name (e.g. result.csv or result.xlsx): ")?;
    if name.is_empty() {
        return Err(CliError::op("no output file name entered"));
    }
    let output = dir.join(&name);
    // fail on a bad extension before doing the work
    OutputFormat::from_path(&output)?;

    let outcome = clean(&table, &columns)?;
    save(&outcome.table, &output, &ctx.settings.output.sheet_name)?;

    p.say("")?;
    p.say(style("Done!").green())?;
    p.say(format!("Rows before: {}", outcome.before))?;
    p.say(format!("Rows after:  {}", outcome.after))?;
    p.say(format!("Saved to:    {}", output.display()))
}
