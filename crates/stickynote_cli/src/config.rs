//! Data directory and logging configuration for the CLI.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Overrides the data directory when set.
pub const HOME_ENV: &str = "STICKY_NOTES_HOME";
/// Overrides the log level when set.
pub const LOG_LEVEL_ENV: &str = "STICKY_NOTES_LOG";

const APP_DIR_NAME: &str = "sticky-notes";
const DB_FILE_NAME: &str = "sticky-notes.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// - Linux: `$XDG_DATA_HOME/sticky-notes` (usually `~/.local/share/sticky-notes`)
    /// - macOS: `~/Library/Application Support/sticky-notes`
    /// - Windows: `%APPDATA%\sticky-notes`
    pub fn from_env() -> Result<Self> {
        let data_dir = match std::env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => absolutize(PathBuf::from(dir))?,
            _ => dirs::data_dir()
                .context("Could not determine data directory")?
                .join(APP_DIR_NAME),
        };
        let log_level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| stickynote_core::default_log_level().to_string());

        Ok(Self {
            data_dir,
            log_level,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    Ok(cwd.join(path))
}

/// Where `export` writes when no output path is given.
pub fn default_export_path(dir: &Path) -> PathBuf {
    dir.join(stickynote_core::EXPORT_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/data/sticky"),
            log_level: "info".to_string(),
        };
        assert_eq!(
            config.db_path(),
            PathBuf::from("/data/sticky/sticky-notes.sqlite3")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/data/sticky/logs"));
    }

    #[test]
    fn relative_paths_are_made_absolute() {
        let path = absolutize(PathBuf::from("notes")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("notes"));
    }

    #[test]
    fn default_export_uses_backup_file_name() {
        let path = default_export_path(Path::new("/tmp"));
        assert_eq!(path, PathBuf::from("/tmp/sticky-notes-backup.json"));
    }
}
