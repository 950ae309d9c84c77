//! hipster CLI - Command-line interface
//!
//! Builds HiPS pyramids from image catalogs and manages the config file.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;
use commands::mosaic::MosaicArgs;

#[derive(Parser)]
#[command(name = "hipster")]
#[command(version = hipster::VERSION)]
#[command(about = "Build HiPS image pyramids from catalogs of sky-placed images", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.hipster/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every order of a pyramid, then the Allsky mosaics
    Generate(GenerateArgs),

    /// Rebuild the Allsky mosaics of an existing pyramid
    Mosaic(MosaicArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(config, args),
        Commands::Mosaic(args) => commands::mosaic::run(config, args),
        Commands::Config { command } => commands::config::run(config, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
