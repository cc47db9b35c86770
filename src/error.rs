use crate::core::commands::{CommandError, NO_HISTORY};
use crate::core::config::ConfigError;
use crate::process::ProcessError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    Command(CommandError),
    ProcessError(ProcessError),
    ConfigError(ConfigError),
    FlagError(String),
    NoHistory,
    LineTooLong { length: usize, max: usize },
    TooManyArguments { count: usize, max: usize },
    BackgroundPipeline,
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<CommandError> for ShellError {
    fn from(err: CommandError) -> Self {
        ShellError::Command(err)
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        ShellError::ProcessError(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::ConfigError(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "Readline error: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
            ShellError::Command(e) => write!(f, "{}", e),
            ShellError::ProcessError(e) => write!(f, "{}", e),
            ShellError::ConfigError(e) => write!(f, "Config error: {}", e),
            ShellError::FlagError(msg) => write!(f, "Flag error: {}", msg),
            ShellError::NoHistory => write!(f, "{}", NO_HISTORY),
            ShellError::LineTooLong { length, max } => {
                write!(f, "line too long ({} bytes, limit {})", length, max)
            }
            ShellError::TooManyArguments { count, max } => {
                write!(f, "too many arguments ({}, limit {})", count, max)
            }
            ShellError::BackgroundPipeline => {
                write!(f, "Error: Pipes cannot run in background in this version.")
            }
        }
    }
}

impl std::error::Error for ShellError {}
