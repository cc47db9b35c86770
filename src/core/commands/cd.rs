use std::env;
use std::io::Write;
use std::path::PathBuf;

use super::{Command, CommandError, Flow};
use crate::core::state::ShellState;

#[derive(Clone, Default)]
pub struct CdCommand;

impl CdCommand {
    pub fn new() -> Self {
        Self
    }

    /// `$HOME`, falling back to the platform's notion of the home directory.
    fn home_dir() -> Result<PathBuf, CommandError> {
        env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or_else(|| CommandError::ExecutionError("cd: HOME not set".to_string()))
    }
}

impl Command for CdCommand {
    fn execute(
        &self,
        args: &[String],
        _state: &mut ShellState,
        _out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let target = match args {
            [] => Self::home_dir()?,
            [path] => PathBuf::from(path),
            _ => {
                return Err(CommandError::InvalidArguments(
                    "cd: too many arguments".to_string(),
                ))
            }
        };

        env::set_current_dir(&target).map_err(|e| {
            CommandError::ExecutionError(format!("cd: {}: {}", target.display(), e))
        })?;
        tracing::debug!(dir = %target.display(), "changed directory");
        Ok(Flow::Continue)
    }
}
