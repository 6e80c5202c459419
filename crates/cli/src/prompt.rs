// Line-oriented prompt adapter.
// Generic over reader/writer so every flow can be driven from a byte buffer in tests.

use std::fmt::Display;
use std::io::{BufRead, Write};

use xlsel_io::inputs::clean_path;

use crate::CliError;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> Result<(), CliError> {
        writeln!(self.output, "{}", line).map_err(CliError::terminal)
    }

    /// Print `prompt` and read one trimmed line. End of input ends the session.
    pub fn ask(&mut self, prompt: &str) -> Result<String, CliError> {
        write!(self.output, "{}", prompt).map_err(CliError::terminal)?;
        self.output.flush().map_err(CliError::terminal)?;

        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(CliError::terminal)?;
        if n == 0 {
            // Keep the next message off the prompt line.
            writeln!(self.output).map_err(CliError::terminal)?;
            return Err(CliError::end_of_input());
        }
        Ok(line.trim().to_string())
    }

    /// Like `ask`, with surrounding quotes stripped from the answer.
    pub fn ask_path(&mut self, prompt: &str) -> Result<String, CliError> {
        Ok(clean_path(&self.ask(prompt)?))
    }

    /// Re-prompt until the answer is one of `valid`. Blank picks `default` when given.
    pub fn choice(&mut self, prompt: &str, valid: &[&str], default: Option<&str>) -> Result<String, CliError> {
        loop {
            let answer = self.ask(prompt)?;
            if answer.is_empty() {
                if let Some(d) = default {
                    return Ok(d.to_string());
                }
            }
            if let Some(v) = valid.iter().find(|v| v.eq_ignore_ascii_case(&answer)) {
                return Ok(v.to_string());
            }
            self.say(format!("Invalid input, enter one of {}", valid.join("/")))?;
        }
    }

    /// y/n question. The default is shown in the prompt.
    pub fn yes_no(&mut self, question: &str, default: bool) -> Result<bool, CliError> {
        let shown = if default { "y" } else { "n" };
        let prompt = format!("{} (y/n, default {}): ", question, shown);
        Ok(self.choice(&prompt, &["y", "n"], Some(shown))? == "y")
    }

    /// Re-prompt until the answer is an integer greater than 0.
    pub fn positive_int(&mut self, prompt: &str) -> Result<usize, CliError> {
        self.int_in_range(prompt, 1, usize::MAX)
    }

    /// Re-prompt until the answer is an integer in `min..=max`.
    pub fn int_in_range(&mut self, prompt: &str, min: usize, max: usize) -> Result<usize, CliError> {
        loop {
            let answer = self.ask(prompt)?;
            match parse_in_range(&answer, min, max) {
                Ok(n) => return Ok(n),
                Err(msg) => self.say(msg)?,
            }
        }
    }

    /// Integer in `min..=max`, or `None` for a blank answer.
    pub fn optional_int(&mut self, prompt: &str, min: usize, max: usize) -> Result<Option<usize>, CliError> {
        loop {
            let answer = self.ask(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match parse_in_range(&answer, min, max) {
                Ok(n) => return Ok(Some(n)),
                Err(msg) => self.say(msg)?,
            }
        }
    }
}

fn parse_in_range(answer: &str, min: usize, max: usize) -> Result<usize, String> {
    let n: usize = match answer.parse() {
        Ok(n) => n,
        Err(_) if min > 0 => return Err("Invalid input, enter an integer greater than 0".to_string()),
        Err(_) => return Err("Invalid input, enter a non-negative integer".to_string()),
    };
    if n < min || n > max {
        if max == usize::MAX {
            return Err(format!("Invalid input, enter an integer of at least {}", min));
        }
        return Err(format!("Out of range, enter an integer between {} and {}", min, max));
    }
    Ok(n)
}
