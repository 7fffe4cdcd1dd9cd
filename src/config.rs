//! User settings from `config.toml`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{EditorError, Result};

const DEFAULT_HISTORY_SIZE: usize = 10;
const DEFAULT_CONTEXT_LINES: usize = 2;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of prompt lines kept for Up/Down recall.
    pub history_size: usize,
    /// Lines shown on each side of the current line by `c`.
    pub context_lines: usize,
    /// Logging is off unless this is set.
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            history_size: DEFAULT_HISTORY_SIZE,
            context_lines: DEFAULT_CONTEXT_LINES,
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// `<config dir>/ged/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ged").join("config.toml"))
    }

    /// Loads `path`. A missing file gives the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => {
                return Err(EditorError::Config {
                    path: path.to_owned(),
                    message: e.to_string(),
                })
            }
        };
        Self::parse(&text).map_err(|message| EditorError::Config {
            path: path.to_owned(),
            message,
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Config, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::parse("context_lines = 5\nlog_file = \"/tmp/ged.log\"").unwrap();
        assert_eq!(config.context_lines, 5);
        assert_eq!(config.history_size, DEFAULT_HISTORY_SIZE);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/ged.log")));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(Config::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "history_size = \"many\"").unwrap();

        match Config::load(&path) {
            Err(EditorError::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
