use std::io::Write;

use super::{Command, CommandError, Flow};
use crate::core::state::ShellState;

const USAGE: &str = "\
dropshell help:
Type program names and arguments, and hit enter.
Append '&' for background execution.
Use 'cmd1 | cmd2' to connect two programs with a pipe.
Use '!!' to execute the last command.
Built-in commands:
  cd [path] : Change directory (HOME when no path is given)
  pwd       : Print working directory
  exit      : Exit the shell
  help      : Show this help message
  history   : Show the last executed command";

#[derive(Clone, Default)]
pub struct HelpCommand;

impl HelpCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for HelpCommand {
    fn execute(
        &self,
        _args: &[String],
        _state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        writeln!(out, "{}", USAGE)?;
        Ok(Flow::Continue)
    }
}
