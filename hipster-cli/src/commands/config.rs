//! Configuration management CLI commands.
//!
//! Provides `config init`, `config path`, and `config show`.

use std::path::Path;

use clap::Subcommand;
use hipster::config::ConfigFile;

use super::common::{load_config, resolve_config_path};
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a config file with default values if none exists
    Init,

    /// Show the configuration file path
    Path,

    /// Print the effective configuration
    Show,
}

/// Run a config subcommand.
pub fn run(config_path: Option<&Path>, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init => run_init(config_path),
        ConfigCommands::Path => run_path(config_path),
        ConfigCommands::Show => run_show(config_path),
    }
}

fn run_init(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    if ConfigFile::ensure_exists_at(&path)? {
        println!("Created {}", path.display());
    } else {
        println!("Config file already exists: {}", path.display());
    }
    Ok(())
}

fn run_path(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    println!("{}", path.display());
    if !path.exists() {
        println!("(not created yet, run 'hipster config init')");
    }
    Ok(())
}

fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    print!("{}", config.to_config_string());
    Ok(())
}
