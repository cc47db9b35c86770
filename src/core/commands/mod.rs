use std::collections::BTreeMap;
use std::io::Write;

mod cd;
mod exit;
mod help;
mod history;
mod pwd;

pub use cd::CdCommand;
pub use exit::ExitCommand;
pub use help::HelpCommand;
pub use history::{HistoryCommand, NO_HISTORY};
pub use pwd::PwdCommand;

use crate::core::state::ShellState;

/// Names the dispatcher recognises, matched exactly against the first token.
pub const BUILTIN_NAMES: [&str; 5] = ["exit", "cd", "pwd", "help", "history"];

#[derive(Debug)]
pub enum CommandError {
    InvalidArguments(String),
    ExecutionError(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidArguments(msg) => write!(f, "invalid arguments: {}", msg),
            CommandError::ExecutionError(msg) => write!(f, "{}", msg),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

/// What the REPL does after a built-in returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub trait Command {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Exit(ExitCommand),
    Cd(CdCommand),
    Pwd(PwdCommand),
    Help(HelpCommand),
    History(HistoryCommand),
}

impl Command for CommandType {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        match self {
            CommandType::Exit(cmd) => cmd.execute(args, state, out),
            CommandType::Cd(cmd) => cmd.execute(args, state, out),
            CommandType::Pwd(cmd) => cmd.execute(args, state, out),
            CommandType::Help(cmd) => cmd.execute(args, state, out),
            CommandType::History(cmd) => cmd.execute(args, state, out),
        }
    }
}

/// Built-in dispatcher. Runs commands inside the shell process.
#[derive(Clone)]
pub struct BuiltinRegistry {
    commands: BTreeMap<&'static str, CommandType>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("exit", CommandType::Exit(ExitCommand::new()));
        commands.insert("cd", CommandType::Cd(CdCommand::new()));
        commands.insert("pwd", CommandType::Pwd(PwdCommand::new()));
        commands.insert("help", CommandType::Help(HelpCommand::new()));
        commands.insert("history", CommandType::History(HistoryCommand::new()));
        Self { commands }
    }

    #[cfg(test)]
    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Runs the built-in named by `args[0]`. Returns `None` when `args` does
    /// not start with a built-in name.
    pub fn dispatch(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Option<Result<Flow, CommandError>> {
        let (name, rest) = args.split_first()?;
        let command = self.commands.get(name.as_str())?;
        tracing::debug!(builtin = %name, "running built-in");
        Some(command.execute(rest, state, out))
    }
}
