mod completer;
pub mod history;
pub mod parser;

pub use completer::ShellCompleter;
pub use history::History;
pub use parser::ParsedCommand;
