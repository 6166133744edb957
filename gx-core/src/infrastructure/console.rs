// gx-core/src/infrastructure/console.rs

use std::io::{BufRead, Write};
use tracing::debug;

use crate::error::GxError;
use crate::ports::console::{Console, INVALID_INPUT};

/// Line-oriented console: one answer per input line.
///
/// With `echo` on, every answer read is written back to the output, so a
/// transcript of a piped session reads like an interactive one.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
    echo: bool,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W, echo: bool) -> Self {
        Self {
            input,
            output,
            echo,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, prompt: &str) -> Result<String, GxError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            debug!("Input exhausted at prompt {:?}", prompt.trim_end());
            return Err(GxError::InputExhausted);
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        if self.echo {
            writeln!(self.output, "{}", answer)?;
        }
        Ok(answer)
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn say(&mut self, text: &str) -> Result<(), GxError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, GxError> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.prompt(&format!("{} {}: ", message, hint))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say(INVALID_INPUT)?,
            }
        }
    }

    fn select(&mut self, message: &str, choices: &[&str]) -> Result<usize, GxError> {
        loop {
            writeln!(self.output, "{}", message)?;
            for (i, choice) in choices.iter().enumerate() {
                writeln!(self.output, "    {}. {}", i + 1, choice)?;
            }
            let answer = self.prompt(": ")?;
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
                _ => self.say(INVALID_INPUT)?,
            }
        }
    }

    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String, GxError> {
        let prompt = match default {
            Some(d) if !d.is_empty() => format!("{} [{}]: ", message, d),
            // an empty default (passwords) accepts a blank line silently
            _ => format!("{}: ", message),
        };
        loop {
            let answer = self.prompt(&prompt)?;
            let answer = answer.trim();
            match (answer.is_empty(), default) {
                (false, _) => return Ok(answer.to_string()),
                (true, Some(d)) => return Ok(d.to_string()),
                (true, None) => self.say(INVALID_INPUT)?,
            }
        }
    }

    fn secret(&mut self, message: &str) -> Result<String, GxError> {
        self.prompt(&format!("{}: ", message))
    }
}
