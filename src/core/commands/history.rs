use std::io::Write;

use super::{Command, CommandError, Flow};
use crate::core::state::ShellState;

pub const NO_HISTORY: &str = "No commands in history.";

#[derive(Clone, Default)]
pub struct HistoryCommand;

impl HistoryCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for HistoryCommand {
    fn execute(
        &self,
        _args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        match state.history.peek() {
            Some(line) => writeln!(out, "Last command: {}", line)?,
            None => writeln!(out, "{}", NO_HISTORY)?,
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &mut ShellState) -> String {
        let mut out = Vec::new();
        HistoryCommand::new().execute(&[], state, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_history_empty() {
        let mut state = ShellState::new();
        assert_eq!(run(&mut state), format!("{}\n", NO_HISTORY));
    }

    #[test]
    fn test_history_shows_last_line() {
        let mut state = ShellState::new();
        state.history.record("ls -l");
        state.history.record("sleep 1 &");
        assert_eq!(run(&mut state), "Last command: sleep 1 &\n");
    }
}
