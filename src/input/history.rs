/// Literal line that replays the stored history entry.
pub const REPLAY_TOKEN: &str = "!!";

/// One-slot command history. Holds the most recent non-replay line.
#[derive(Debug, Default, Clone)]
pub struct History {
    last: Option<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the stored entry. The replay token itself is never stored.
    pub fn record(&mut self, line: &str) {
        if line.trim() == REPLAY_TOKEN {
            return;
        }
        self.last = Some(line.to_owned());
    }

    pub fn peek(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.last.is_some()
    }
}
