use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

#[derive(Clone, Default)]
pub struct PathCompleter;

impl PathCompleter {
    pub fn new() -> Self {
        Self
    }

    pub fn complete_path(&self, incomplete: &str) -> Vec<Pair> {
        let (dir, prefix) = split_input(incomplete);

        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut matches: Vec<Pair> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_owned();
                if !name.starts_with(&prefix) {
                    return None;
                }
                Some(completion_pair(&name, &entry.path(), &dir))
            })
            .collect();

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }
}

/// Splits partial input into the directory to list and the file-name prefix.
fn split_input(incomplete: &str) -> (PathBuf, String) {
    if incomplete.is_empty() {
        return (PathBuf::from("."), String::new());
    }
    if incomplete.ends_with('/') {
        return (PathBuf::from(incomplete), String::new());
    }

    let path = Path::new(incomplete);
    let prefix = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_owned();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (dir, prefix)
}

fn completion_pair(name: &str, path: &Path, dir: &Path) -> Pair {
    let shown = if dir == Path::new(".") {
        name.to_owned()
    } else {
        dir.join(name).to_string_lossy().into_owned()
    };

    if path.is_dir() {
        Pair {
            display: format!("{}/", shown),
            replacement: format!("{}/", shown),
        }
    } else {
        Pair {
            display: shown.clone(),
            replacement: format!("{} ", shown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_split_input() {
        assert_eq!(split_input(""), (PathBuf::from("."), String::new()));
        assert_eq!(split_input("/usr/"), (PathBuf::from("/usr/"), String::new()));
        assert_eq!(split_input("/usr/bi"), (PathBuf::from("/usr"), "bi".to_string()));
        assert_eq!(split_input("src"), (PathBuf::from("."), "src".to_string()));
    }

    #[test]
    fn test_complete_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("alpine.txt"), "").unwrap();
        fs::write(dir.path().join("beta"), "").unwrap();

        let input = format!("{}/al", dir.path().display());
        let matches = PathCompleter::new().complete_path(&input);

        assert_eq!(matches.len(), 2);
        assert!(matches[0].display.ends_with("alpha/"));
        assert!(matches[1].replacement.ends_with("alpine.txt "));
    }
}
