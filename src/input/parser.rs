/// Token that marks the split point between two pipeline stages.
pub const PIPE_MARKER: &str = "|";
/// Trailing token that requests background execution.
pub const BACKGROUND_MARKER: &str = "&";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    pub args: Vec<String>,
    pub background: bool,
}

impl ParsedCommand {
    /// Splits `line` on spaces and tabs. A trailing `&` token is removed and
    /// sets `background`. Nothing else is interpreted, `|` included.
    pub fn parse(line: &str) -> Self {
        let mut args: Vec<String> = line
            .split([' ', '\t', '\n', '\r'])
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();

        let background = args.last().is_some_and(|last| last == BACKGROUND_MARKER);
        if background {
            args.pop();
        }

        Self { args, background }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Index of the first pipe marker, if any.
    pub fn pipe_position(&self) -> Option<usize> {
        self.args.iter().position(|arg| arg == PIPE_MARKER)
    }
}
