use std::io::Write;

use super::{Command, CommandError, Flow};
use crate::core::state::ShellState;

#[derive(Clone, Default)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(
        &self,
        _args: &[String],
        _state: &mut ShellState,
        _out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        Ok(Flow::Exit)
    }
}
