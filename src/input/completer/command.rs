use std::{collections::BTreeSet, env, fs};

use rustyline::completion::Pair;

use crate::core::commands::BUILTIN_NAMES;

/// Completes the first word of a line from built-in names and `PATH`.
#[derive(Clone, Default)]
pub struct CommandCompleter {
    commands: BTreeSet<String>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        let mut completer = Self::default();
        completer.refresh_commands();
        completer
    }

    pub fn refresh_commands(&mut self) {
        self.commands.clear();
        self.commands
            .extend(BUILTIN_NAMES.iter().map(|name| name.to_string()));
        self.add_path_commands();
    }

    fn add_path_commands(&mut self) {
        let Some(path_var) = env::var_os("PATH") else {
            return;
        };
        for dir in env::split_paths(&path_var) {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                let is_candidate = entry
                    .file_type()
                    .map(|ft| ft.is_file() || ft.is_symlink())
                    .unwrap_or(false);
                if !is_candidate {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    self.commands.insert(name.to_owned());
                }
            }
        }
    }

    pub fn complete_command(&self, prefix: &str) -> Vec<Pair> {
        self.commands
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect()
    }
}
