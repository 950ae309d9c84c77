//! Mosaic command - rebuild Allsky mosaics from an existing pyramid.

use std::path::{Path, PathBuf};

use clap::Args;
use hipster::config::{ConfigFile, ORDER_LIMIT};
use hipster::mosaic::MosaicBuilder;
use hipster::output::{DiskTileStore, OutputLayout, TileFormat};
use hipster::pipeline::build_mosaics;

use super::common::{load_config, start_logging};
use crate::error::CliError;

/// Arguments for the mosaic command.
#[derive(Debug, Default, Args)]
pub struct MosaicArgs {
    /// Deepest order to assemble (defaults to the configured max_order)
    #[arg(long)]
    pub max_order: Option<u8>,

    /// Parent directory of the `<title>/projection` tree
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Survey title
    #[arg(long)]
    pub title: Option<String>,

    /// Format the tiles were written in (jpeg or png)
    #[arg(long)]
    pub format: Option<TileFormat>,

    /// Thumbnail edge in pixels
    #[arg(long)]
    pub edge: Option<u32>,

    /// Log at DEBUG level
    #[arg(long)]
    pub debug: bool,
}

impl MosaicArgs {
    /// Fold the command-line overrides into `config`.
    pub fn apply(&self, config: &mut ConfigFile) {
        if let Some(max_order) = self.max_order {
            config.pyramid.max_order = max_order;
        }
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
        if let Some(title) = &self.title {
            config.output.title = title.clone();
        }
        if let Some(format) = self.format {
            config.output.tile_format = format;
        }
        if let Some(edge) = self.edge {
            config.output.mosaic_edge = edge;
        }
    }
}

/// Run the mosaic command.
pub fn run(config_path: Option<&Path>, args: MosaicArgs) -> Result<(), CliError> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    let _logging = start_logging(&config, args.debug, "mosaic")?;

    let max_order = config.pyramid.max_order;
    if max_order >= ORDER_LIMIT {
        return Err(CliError::Config(format!(
            "max_order {} must be below {}",
            max_order, ORDER_LIMIT
        )));
    }

    let layout = OutputLayout::new(&config.output.directory, &config.output.title, max_order);
    if !layout.exists() {
        return Err(CliError::Config(format!(
            "no pyramid found at {} (run 'hipster generate' first)",
            layout.root().display()
        )));
    }

    let store = DiskTileStore::new(layout.root(), config.output.tile_format);
    let mosaic = MosaicBuilder::new(config.output.mosaic_edge);
    let paths = build_mosaics(max_order, &mosaic, &store)?;

    for path in &paths {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = ConfigFile::default();
        let args = MosaicArgs {
            max_order: Some(2),
            edge: Some(16),
            format: Some(TileFormat::Png),
            ..Default::default()
        };
        args.apply(&mut config);

        assert_eq!(config.pyramid.max_order, 2);
        assert_eq!(config.output.mosaic_edge, 16);
        assert_eq!(config.output.tile_format, TileFormat::Png);
        assert_eq!(config.output.title, ConfigFile::default().output.title);
    }
}
