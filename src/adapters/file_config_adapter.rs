//! INI file configuration adapter.

use crate::domain::error::HolderscanError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HolderscanError> {
        let mut config = Ini::new();
        config.load(&path).map_err(|e| HolderscanError::ConfigParse {
            file: path.as_ref().display().to_string(),
            reason: e,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, HolderscanError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|e| HolderscanError::ConfigParse {
                file: "<inline>".to_string(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    /// A key the run cannot proceed without.
    pub fn require_string(&self, section: &str, key: &str) -> Result<String, HolderscanError> {
        self.get_string(section, key)
            .ok_or_else(|| HolderscanError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}
