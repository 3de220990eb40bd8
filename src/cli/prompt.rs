//! Terminal operator
//!
//! Drives the session controller from stdin/stdout.

use std::io::{self, BufRead, Write};

use crate::app::Operator;
use crate::errors::{SessionError, SessionResult};

use super::progress::{ActivitySpinner, ProgressConfig};

/// [`Operator`] reading answers from a line source and printing to a writer
pub struct TerminalOperator<R, W> {
    input: R,
    output: W,
    spinner: ActivitySpinner,
}

impl TerminalOperator<io::StdinLock<'static>, io::Stdout> {
    /// Operator bound to the process stdin and stdout
    pub fn stdio() -> Self {
        Self::new(
            io::stdin().lock(),
            io::stdout(),
            ActivitySpinner::new(ProgressConfig::default()),
        )
    }
}

impl<R: BufRead, W: Write> TerminalOperator<R, W> {
    /// Operator over arbitrary streams
    pub fn new(input: R, output: W, spinner: ActivitySpinner) -> Self {
        Self {
            input,
            output,
            spinner,
        }
    }

    /// Release the underlying streams
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Operator for TerminalOperator<R, W> {
    fn prompt(&mut self, message: &str) -> SessionResult<String> {
        self.spinner.stop();
        write!(self.output, "{}", message).map_err(SessionError::Input)?;
        self.output.flush().map_err(SessionError::Input)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(SessionError::Input)?;
        if read == 0 {
            return Err(SessionError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn report(&mut self, line: &str) {
        self.spinner.stop();
        // Status lines are best effort; a closed stdout surfaces on the next prompt
        let _ = writeln!(self.output, "{}", line);
    }

    fn busy(&mut self, message: &str) {
        self.spinner.start(message);
    }

    fn idle(&mut self) {
        self.spinner.stop();
    }
}
