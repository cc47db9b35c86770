use super::ConfigError;
use std::env;
use std::path::{Path, PathBuf};

pub const RC_FILE_NAME: &str = ".dropshellrc";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub rc_path: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Result<Self, ConfigError> {
        let home = env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::HomeDirNotFound)?;
        Ok(Self::from_home(&home))
    }

    pub fn from_home(home: &Path) -> Self {
        ConfigPaths {
            rc_path: home.join(RC_FILE_NAME),
        }
    }
}
