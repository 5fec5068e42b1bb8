//! Line-oriented console I/O.
//!
//! All reads and writes go through `Console` so the command loop can run
//! against scripted input.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Terminates multi-line input.
pub const BLOCK_TERMINATOR: &str = "END";

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes one line.
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Writes `label` without newline and reads one line.
    ///
    /// Returns `None` at end of input. The trailing newline is stripped.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// `true` for `y`/`yes` (any case); `false` otherwise, including EOF.
    pub fn confirm(&mut self, label: &str) -> io::Result<bool> {
        let answer = self.prompt(label)?.unwrap_or_default();
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// Reads lines until one that is exactly `END` after trimming, or EOF.
    pub fn read_block(&mut self) -> io::Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim() == BLOCK_TERMINATOR {
                break;
            }
            lines.push(line);
        }
        Ok(lines)
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        if buffer.ends_with('\n') {
            buffer.pop();
            if buffer.ends_with('\r') {
                buffer.pop();
            }
        }
        Ok(Some(buffer))
    }
}
