use std::{fs, path::Path};

use super::{ConfigError, ShellConfig};

/// Reads `key = value` rc files into a [`ShellConfig`].
pub struct ConfigLoader<'a> {
    config: &'a mut ShellConfig,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(config: &'a mut ShellConfig) -> Self {
        Self { config }
    }

    pub fn source_if_exists(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no rc file");
            return Ok(());
        }
        self.source(path)
    }

    pub fn source(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading rc file");
        for (index, line) in content.lines().enumerate() {
            self.process_line(index + 1, line)?;
        }
        Ok(())
    }

    fn process_line(&mut self, number: usize, line: &str) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(ConfigError::MissingValue(number))?;
        let key = key.trim();
        let value = unquote(value.trim());

        self.config.set(key, value).map_err(|e| match e {
            ConfigError::InvalidValue { key, value, .. } => ConfigError::InvalidValue {
                line: number,
                key,
                value,
            },
            other => other,
        })
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
