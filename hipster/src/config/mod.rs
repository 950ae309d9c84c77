//! Configuration for hipster.
//!
//! Two layers:
//!
//! - [`ConfigFile`]: the user's `~/.hipster/config.ini`, one settings struct
//!   per INI section, loaded with defaults for anything missing.
//! - [`PyramidConfig`]: the validated, typed value the pyramid builder
//!   consumes, built from a `ConfigFile` or directly with `with_*` setters.
//!
//! # Example
//!
//! ```
//! use hipster::config::{ConfigFile, PyramidConfig};
//!
//! let file = ConfigFile::default();
//! let config = PyramidConfig::from_config_file(&file).with_max_order(1);
//! assert!(config.validate().is_ok());
//! ```

mod defaults;
mod file;
mod parser;
mod pyramid;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use pyramid::{ConfigError, PyramidConfig, RootCandidates};
pub use settings::*;
