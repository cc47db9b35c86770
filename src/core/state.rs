use crate::input::History;

/// Session state owned by the REPL and lent to built-ins.
#[derive(Debug, Default)]
pub struct ShellState {
    pub history: History,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }
}
