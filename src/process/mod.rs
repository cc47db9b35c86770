use std::fmt;

pub mod launcher;
pub mod reaper;
pub mod signal;

pub use launcher::{spawn, wait_for, Pid, Redirect};
pub use reaper::reap_finished;

#[derive(Debug)]
pub enum ProcessError {
    InvalidArgument(String),
    EmptyStage(&'static str),
    Fork(std::io::Error),
    Pipe(std::io::Error),
    Wait(std::io::Error),
    Signal(std::io::Error),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::InvalidArgument(arg) => {
                write!(f, "argument contains a NUL byte: {:?}", arg)
            }
            ProcessError::EmptyStage(side) => {
                write!(f, "incomplete pipeline: missing command {} |", side)
            }
            ProcessError::Fork(e) => write!(f, "fork failed: {}", e),
            ProcessError::Pipe(e) => write!(f, "pipe failed: {}", e),
            ProcessError::Wait(e) => write!(f, "wait failed: {}", e),
            ProcessError::Signal(e) => write!(f, "signal setup failed: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Fork(e)
            | ProcessError::Pipe(e)
            | ProcessError::Wait(e)
            | ProcessError::Signal(e) => Some(e),
            _ => None,
        }
    }
}
