use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{EditorError, Result};

/// Installs the global subscriber when a log file is configured. The editor
/// draws on the terminal, so nothing is ever logged to stdout or stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &Config) -> Result<()> {
    let path = match &config.log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let config_error = |message: String| EditorError::Config {
        path: path.clone(),
        message,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| config_error(format!("cannot open log file: {}", e)))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| config_error(format!("bad log_level {:?}: {}", config.log_level, e)))?,
    };

    // Already installed (tests, or a second init) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_log_file_is_a_no_op() {
        assert!(init(&Config::default()).is_ok());
    }

    #[test]
    fn unwritable_log_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            log_file: Some(dir.path().join("missing").join("ged.log")),
            ..Config::default()
        };
        assert!(matches!(init(&config), Err(EditorError::Config { .. })));
    }
}
