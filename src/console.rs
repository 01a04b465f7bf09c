use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::error::Result;

/// Prompt shown before every line of user input.
pub const INPUT_PROMPT: &str = ">> ";

/// Line-oriented console used by the interactive commands.
///
/// Generic over its reader and writer so the prompt loops can be driven by
/// scripted input in tests.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Console bound to the process stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and reads one line with the line terminator removed.
    /// Returns `None` once input is exhausted.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Writes text without a trailing newline.
    pub fn say_raw(&mut self, text: impl Display) -> Result<()> {
        write!(self.output, "{text}")?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Reports a recoverable error; the caller re-prompts.
    pub fn error(&mut self, message: impl Display) -> Result<()> {
        tracing::debug!("user error: {message}");
        writeln!(self.output, "<!> {message}")?;
        Ok(())
    }

    /// Asks a `[Y/N]` question until the first character of the reply is
    /// `y` or `n`. End of input counts as "no".
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            let Some(reply) = self.read_line(&format!("{question} [Y/N]: "))? else {
                return Ok(false);
            };
            match reply.trim().to_lowercase().chars().next() {
                Some('y') => return Ok(true),
                Some('n') => return Ok(false),
                _ => continue,
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
