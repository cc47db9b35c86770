use std::io::Write;

use super::pipeline::Pipeline;
use crate::core::commands::{BuiltinRegistry, Flow};
use crate::core::config::ShellConfig;
use crate::core::state::ShellState;
use crate::error::ShellError;
use crate::input::history::REPLAY_TOKEN;
use crate::input::ParsedCommand;
use crate::process::{self, Redirect};

/// Evaluates one input line at a time against the session state.
///
/// Built-in output, the `!!` echo and background notices go to the writer
/// passed to [`Interpreter::eval`]; spawned programs write straight to the
/// inherited standard streams. In quiet mode the echo and the notices are
/// dropped.
pub struct Interpreter {
    state: ShellState,
    builtins: BuiltinRegistry,
    max_line_length: usize,
    max_args: usize,
    quiet: bool,
}

impl Interpreter {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            state: ShellState::new(),
            builtins: BuiltinRegistry::new(),
            max_line_length: config.max_line_length,
            max_args: config.max_args,
            quiet: config.quiet,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn eval(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow, ShellError> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        if line.len() > self.max_line_length {
            return Err(ShellError::LineTooLong {
                length: line.len(),
                max: self.max_line_length,
            });
        }

        let effective = self.resolve_history(line, out)?;

        // Tokens are owned copies; the history slot keeps its own string.
        let command = ParsedCommand::parse(&effective);
        if command.is_empty() {
            return Ok(Flow::Continue);
        }
        if command.args.len() > self.max_args {
            return Err(ShellError::TooManyArguments {
                count: command.args.len(),
                max: self.max_args,
            });
        }

        self.dispatch(&command, out)
    }

    /// Substitutes `!!` with the stored line, or records a fresh line.
    fn resolve_history(&mut self, line: &str, out: &mut dyn Write) -> Result<String, ShellError> {
        if line.trim() != REPLAY_TOKEN {
            self.state.history.record(line);
            return Ok(line.to_owned());
        }

        let stored = self
            .state
            .history
            .peek()
            .ok_or(ShellError::NoHistory)?
            .to_owned();
        tracing::debug!(line = %stored, "replaying history");
        if !self.quiet {
            writeln!(out, "{}", stored)?;
        }
        Ok(stored)
    }

    fn dispatch(&mut self, command: &ParsedCommand, out: &mut dyn Write) -> Result<Flow, ShellError> {
        if let Some(result) = self.builtins.dispatch(&command.args, &mut self.state, out) {
            return Ok(result?);
        }

        out.flush()?;
        tracing::debug!(
            program = command.program().unwrap_or_default(),
            background = command.background,
            "running external command"
        );

        if command.pipe_position().is_some() {
            if command.background {
                return Err(ShellError::BackgroundPipeline);
            }
            Pipeline::split(&command.args)?.execute()?;
            return Ok(Flow::Continue);
        }

        let pid = process::spawn(&command.args, &Redirect::inherit())?;
        if command.background {
            if !self.quiet {
                writeln!(out, "[Process {} running in background]", pid)?;
            }
        } else {
            process::wait_for(pid)?;
        }
        Ok(Flow::Continue)
    }
}
