// xlsel - interactive merge / split / dedupe / clean for CSV and Excel files

mod clean;
mod dedupe;
mod exit_codes;
mod merge;
mod prompt;
mod split;
mod util;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::{self, ExitCode};

use clap::{ArgAction, Parser};
use console::style;
use xlsel_config::settings::CONFIG_ENV;
use xlsel_config::Settings;
use xlsel_engine::EngineError;
use xlsel_io::csv::parse_encodings;
use xlsel_io::{IoError, LoadOptions};

use exit_codes::{EXIT_ERROR, EXIT_INTERRUPTED, EXIT_SUCCESS, EXIT_USAGE};
use prompt::Prompter;

const GOODBYE: &str = "Thanks for using xlsel, goodbye!";

#[derive(Parser)]
#[command(name = "xlsel")]
#[command(about = "Merge, split, deduplicate and clean CSV/Excel files from an interactive menu")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file [default: <config dir>/xlsel/settings.toml]
    #[arg(long, env = CONFIG_ENV, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log more on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  xlsel-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
    /// Ends the menu loop instead of returning to it.
    fatal: bool,
}

impl CliError {
    /// Operation failure: reported, then the menu is shown again.
    pub fn op(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None, fatal: false }
    }

    /// Reading stdin or writing stdout failed.
    pub fn terminal(err: io::Error) -> Self {
        Self { code: EXIT_ERROR, message: format!("terminal I/O failed: {}", err), hint: None, fatal: true }
    }

    /// Stdin closed: same as choosing exit.
    pub fn end_of_input() -> Self {
        Self { code: EXIT_SUCCESS, message: "end of input".to_string(), hint: None, fatal: true }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn ends_session(&self) -> bool {
        self.fatal
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        let base = Self::op(err.to_string());
        match err.available_columns() {
            Some(cols) => base.with_hint(format!("available columns: {}", util::quoted_list(cols))),
            None => base,
        }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let hint = match &err {
            IoError::Engine(inner) => return Self::from(inner.clone()),
            IoError::UnsupportedFormat(_) => Some("inputs: .csv .xlsx .xls; outputs: .csv .xlsx".to_string()),
            IoError::Undecodable { .. } => Some("add the file's encoding to [csv] encodings in settings.toml".to_string()),
            IoError::NotFound(_) => Some("paths are relative to the current directory".to_string()),
            _ => None,
        };
        let base = Self::op(err.to_string());
        match hint {
            Some(h) => base.with_hint(h),
            None => base,
        }
    }
}

fn report(err: &CliError) {
    eprintln!("{} {}", style("error:").red().bold(), err.message);
    if let Some(hint) = &err.hint {
        eprintln!("hint:  {}", hint);
    }
}

// ============================================================================
// Setup
// ============================================================================

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_options(settings: &Settings) -> LoadOptions {
    match parse_encodings(&settings.csv.encodings) {
        Ok(encodings) if !encodings.is_empty() => LoadOptions { encodings },
        Ok(_) => LoadOptions::default(),
        Err(e) => {
            log::warn!("{}; using the built-in encoding list", e);
            LoadOptions::default()
        }
    }
}

/// Everything an operation needs besides the prompter.
pub struct Context {
    pub settings: Settings,
    pub load: LoadOptions,
}

// ============================================================================
// Menu
// ============================================================================

fn run<R: BufRead, W: Write>(p: &mut Prompter<R, W>, ctx: &Context) -> Result<(), CliError> {
    p.say(style("Welcome to xlsel").bold())?;
    p.say("Available actions:")?;
    p.say("  1) merge several CSV/Excel files")?;
    p.say("  2) split one CSV/Excel file")?;
    p.say("  3) remove rows of a main file found in reference files")?;
    p.say("  4) drop rows with blank values")?;

    loop {
        p.say("")?;
        p.say(util::RULE)?;
        let action = p.choice(
            "Choose: 1) merge  2) split  3) dedupe  4) clean  5) exit (default 1): ",
            &["1", "2", "3", "4", "5"],
            Some("1"),
        )?;

        let result = match action.as_str() {
            "1" => merge::run(p, ctx),
            "2" => split::run(p, ctx),
            "3" => dedupe::run(p, ctx),
            "4" => clean::run(p, ctx),
            _ => {
                p.say(GOODBYE)?;
                return Ok(());
            }
        };

        if let Err(err) = result {
            if err.ends_session() {
                return Err(err);
            }
            log::debug!("operation failed: {:?}", err);
            report(&err);
        }

        p.say("")?;
        p.say(util::RULE)?;
        let next = p.choice("Choose: 1) back to menu  2) exit (default 2): ", &["1", "2"], Some("2"))?;
        if next == "2" {
            p.say(GOODBYE)?;
            return Ok(());
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_logging(cli.verbose);

    if let Err(e) = ctrlc::set_handler(|| {
        println!("\n\nInterrupted. {}", GOODBYE);
        process::exit(i32::from(EXIT_INTERRUPTED));
    }) {
        log::warn!("cannot install Ctrl+C handler: {}", e);
    }

    let settings = Settings::load(cli.config.as_deref());
    let ctx = Context { load: load_options(&settings), settings };

    // stdout stays unlocked so the Ctrl+C handler can print.
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    match run(&mut prompter, &ctx) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) if err.code == EXIT_SUCCESS => {
            println!("{}", GOODBYE);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(err) => {
            report(&err);
            ExitCode::from(err.code)
        }
    }
}
