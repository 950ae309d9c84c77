//! Common setup shared across CLI commands.

use std::path::{Path, PathBuf};

use hipster::config::{config_file_path, ConfigFile};
use hipster::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Load `path`, or the default `~/.hipster/config.ini` when none is given.
///
/// A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let path = resolve_config_path(path);
    Ok(ConfigFile::load_from(&path)?)
}

/// The config file a command operates on.
pub fn resolve_config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(config_file_path)
}

/// Start logging to the configured log file and stdout.
///
/// The returned guard must stay alive until the command returns.
pub fn start_logging(config: &ConfigFile, debug: bool, command: &str) -> Result<LoggingGuard, CliError> {
    let guard = init_logging(&config.logging.file, debug)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    info!("hipster v{}", hipster::VERSION);
    info!("hipster CLI: {} command", command);
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_path_prefers_argument() {
        let path = resolve_config_path(Some(Path::new("/tmp/custom.ini")));
        assert_eq!(path, PathBuf::from("/tmp/custom.ini"));
    }

    #[test]
    fn test_resolve_config_path_default() {
        assert_eq!(resolve_config_path(None), config_file_path());
    }

    #[test]
    fn test_load_config_missing_file_gives_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = load_config(Some(&temp_dir.path().join("absent.ini"))).unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
