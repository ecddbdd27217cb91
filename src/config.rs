use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".todo-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "todo.sqlite";
/// Sub-folder of the data directory that receives rotated log files.
const LOG_DIR_NAME: &str = "logs";

/// Where the application keeps its files and how chatty the logs are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Resolve the default layout under the user's home directory.
    pub fn from_home() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Lay the files out beneath an arbitrary directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
            data_dir,
        }
    }

    /// Create the data and log directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).context("failed to create data directory")?;
        fs::create_dir_all(&self.log_dir).context("failed to create log directory")?;
        Ok(())
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_places_database_and_logs_under_data_dir() {
        let config = AppConfig::in_dir("/tmp/todo-manager-test");
        assert_eq!(
            config.db_path,
            PathBuf::from("/tmp/todo-manager-test/todo.sqlite")
        );
        assert_eq!(config.log_dir, PathBuf::from("/tmp/todo-manager-test/logs"));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn ensure_dirs_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::in_dir(dir.path().join("nested"));
        config.ensure_dirs().unwrap();
        assert!(config.data_dir.is_dir());
        assert!(config.log_dir.is_dir());
    }
}
