use std::{fmt, path::PathBuf};

mod loader;
mod paths;

use crate::flags::Flags;
pub use loader::ConfigLoader;
pub use paths::ConfigPaths;

pub const DEFAULT_PROMPT: &str = "dropsh> ";
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;
pub const DEFAULT_MAX_ARGS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    /// Longest accepted input line, in bytes.
    pub max_line_length: usize,
    /// Most tokens accepted on one line.
    pub max_args: usize,
    pub color: bool,
    pub quiet: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            prompt: DEFAULT_PROMPT.to_string(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_args: DEFAULT_MAX_ARGS,
            color: true,
            quiet: false,
        }
    }
}

impl ShellConfig {
    /// Defaults, then the rc file, then command-line overrides.
    pub fn load(flags: &Flags) -> Result<Self, ConfigError> {
        let mut config = ShellConfig::default();

        match flags.get_value("config") {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(ConfigError::ConfigFileNotFound(path));
                }
                ConfigLoader::new(&mut config).source(&path)?;
            }
            None => match ConfigPaths::new() {
                Ok(paths) => ConfigLoader::new(&mut config).source_if_exists(&paths.rc_path)?,
                Err(e) => tracing::debug!("skipping rc file: {}", e),
            },
        }

        config.apply_flags(flags)?;
        Ok(config)
    }

    pub fn apply_flags(&mut self, flags: &Flags) -> Result<(), ConfigError> {
        if let Some(prompt) = flags.get_value("prompt") {
            self.prompt = prompt.clone();
        }
        if let Some(value) = flags.get_value("max-line") {
            self.set("max_line_length", value)?;
        }
        if let Some(value) = flags.get_value("max-args") {
            self.set("max_args", value)?;
        }
        if flags.is_set("no-color") {
            self.color = false;
        }
        if flags.is_set("quiet") {
            self.quiet = true;
        }
        Ok(())
    }

    /// Applies one setting by key. Unknown keys are logged and ignored.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            line: 0,
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "prompt" => self.prompt = value.to_string(),
            "max_line_length" => {
                self.max_line_length = parse_limit(value).ok_or_else(invalid)?;
            }
            "max_args" => self.max_args = parse_limit(value).ok_or_else(invalid)?,
            "color" => self.color = value.parse().map_err(|_| invalid())?,
            _ => tracing::warn!(key, "ignoring unknown setting"),
        }
        Ok(())
    }
}

fn parse_limit(value: &str) -> Option<usize> {
    value.parse().ok().filter(|&n: &usize| n > 0)
}

#[derive(Debug)]
pub enum ConfigError {
    HomeDirNotFound,
    ConfigFileNotFound(PathBuf),
    MissingValue(usize),
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
    IoError(std::io::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HomeDirNotFound => write!(f, "Home directory not found"),
            ConfigError::ConfigFileNotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            ConfigError::MissingValue(line) => {
                write!(f, "line {}: expected `key = value`", line)
            }
            ConfigError::InvalidValue { line: 0, key, value } => {
                write!(f, "invalid value for {}: {}", key, value)
            }
            ConfigError::InvalidValue { line, key, value } => {
                write!(f, "line {}: invalid value for {}: {}", line, key, value)
            }
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
