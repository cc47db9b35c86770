use std::env;
use std::io::Write;

use super::{Command, CommandError, Flow};
use crate::core::state::ShellState;

#[derive(Clone, Default)]
pub struct PwdCommand;

impl PwdCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for PwdCommand {
    fn execute(
        &self,
        _args: &[String],
        _state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let cwd = env::current_dir()
            .map_err(|e| CommandError::ExecutionError(format!("pwd: {}", e)))?;
        writeln!(out, "{}", cwd.display())?;
        Ok(Flow::Continue)
    }
}
