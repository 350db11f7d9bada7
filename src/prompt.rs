use std::io::{self, BufRead, Stdout, StdinLock, Write};

use crate::error::{BuildError, Result};

/// Line-based question and answer over a console.
///
/// Generic over the reader and writer so sessions can be scripted in tests.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// A prompter on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and reads one answer, trimmed.
    ///
    /// # Errors
    /// Returns `BuildError::Prompt` on I/O failure or when input is exhausted.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").map_err(BuildError::Prompt)?;
        self.output.flush().map_err(BuildError::Prompt)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(BuildError::Prompt)?;
        if read == 0 {
            return Err(BuildError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            )));
        }
        Ok(line.trim().to_string())
    }

    /// Asks a yes/no question. Only `y` (any case) counts as yes.
    ///
    /// # Errors
    /// See [`Prompter::ask`].
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{question} (y/n): "))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    /// Prints one line.
    ///
    /// # Errors
    /// Returns `BuildError::Prompt` if the output cannot be written.
    pub fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", line.as_ref()).map_err(BuildError::Prompt)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
