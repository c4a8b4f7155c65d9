use std::io::{BufRead, Write};

use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::shell::{Command, Report, Session};

const PROMPT: &str = "treefs> ";

/// Reads commands line by line and writes one report or error per command.
pub struct Shell<R, W> {
    session: Session,
    input: R,
    output: W,
    interactive: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: Session, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
            interactive: false,
        }
    }

    /// Shows a prompt before every line.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `exit` or end of input. Failed commands are reported and
    /// the loop carries on.
    pub async fn run(&mut self) -> Result<(), ShellError> {
        let mut line = String::new();
        loop {
            if self.interactive {
                write!(self.output, "{PROMPT}").context(OutputSnafu)?;
                self.output.flush().context(OutputSnafu)?;
            }

            line.clear();
            if self.input.read_line(&mut line).context(InputSnafu)? == 0 {
                debug!("End of input");
                break;
            }

            let command = match Command::parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(error) => {
                    write!(self.output, "{}", error.render()).context(OutputSnafu)?;
                    continue;
                }
            };

            match self.session.execute(command).await {
                Ok(Report::Exit) => {
                    writeln!(self.output, "{}", Report::Exit).context(OutputSnafu)?;
                    break;
                }
                Ok(report) => writeln!(self.output, "{report}").context(OutputSnafu)?,
                Err(error) => {
                    warn!("Command failed: {}", line.trim());
                    writeln!(self.output, "{error}").context(OutputSnafu)?;
                }
            }
        }

        self.output.flush().context(OutputSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read a command"))]
    InputError { source: std::io::Error },
    #[snafu(display("Failed to write command output"))]
    OutputError { source: std::io::Error },
}
