//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use hipster::catalog::CatalogError;
use hipster::config::{ConfigError, ConfigFileError};
use hipster::output::LayoutError;
use hipster::pipeline::PyramidError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// A required input was not given on the command line or in config.ini
    MissingInput(&'static str),
    /// Catalog failed to load
    Catalog(CatalogError),
    /// Output directory or metadata error
    Layout(LayoutError),
    /// Pyramid or mosaic generation failed
    Pyramid(PyramidError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Layout(LayoutError::AlreadyExists(_)) => {
                eprintln!();
                eprintln!("Re-run with --force to replace the existing pyramid,");
                eprintln!("or choose another --output directory or --title.");
            }
            CliError::MissingInput(_) => {
                eprintln!();
                eprintln!("Set the path in the [input] section of config.ini");
                eprintln!("(see 'hipster config path') or pass it on the command line.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::MissingInput(what) => write!(f, "No {} given", what),
            CliError::Catalog(e) => write!(f, "Failed to load catalog: {}", e),
            CliError::Layout(e) => write!(f, "{}", e),
            CliError::Pyramid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Layout(e) => Some(e),
            CliError::Pyramid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<LayoutError> for CliError {
    fn from(e: LayoutError) -> Self {
        CliError::Layout(e)
    }
}

impl From<PyramidError> for CliError {
    fn from(e: PyramidError) -> Self {
        CliError::Pyramid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_missing_input() {
        assert_eq!(
            CliError::MissingInput("catalog").to_string(),
            "No catalog given"
        );
    }

    #[test]
    fn test_layout_error_keeps_source() {
        use std::error::Error;

        let err = CliError::from(LayoutError::AlreadyExists(PathBuf::from("out/sky/projection")));
        assert!(err.to_string().contains("--force"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_converts_to_message() {
        let err = CliError::from(ConfigError::HierarchyDepth);
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
