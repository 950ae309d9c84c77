//! Generate command - build a HiPS pyramid from a catalog.
//!
//! Flags override the matching config.ini settings for this run only.

use std::path::{Path, PathBuf};

use clap::Args;
use hipster::catalog::Catalog;
use hipster::config::{ConfigFile, PyramidConfig, RootCandidates};
use hipster::dataset::DirectoryImageStore;
use hipster::mosaic::MosaicBuilder;
use hipster::output::{DiskTileStore, HipsProperties, IndexPage, OutputLayout, TileFormat};
use hipster::pipeline::{build_mosaics, PyramidBuilder};
use hipster::sky::NestedHealpix;

use super::common::{load_config, start_logging};
use crate::error::CliError;

/// Arguments for the generate command.
#[derive(Debug, Default, Args)]
pub struct GenerateArgs {
    /// Replace an existing pyramid with the same title
    #[arg(long)]
    pub force: bool,

    /// Deepest order to build (0-9)
    #[arg(long)]
    pub max_order: Option<u8>,

    /// Tile levels folded into each tile
    #[arg(long = "hierarchy")]
    pub hierarchy_depth: Option<u32>,

    /// Side of the center crop taken from each dataset image
    #[arg(long)]
    pub crop_size: Option<u32>,

    /// Side of a leaf tile in pixels (power of two)
    #[arg(long)]
    pub output_size: Option<u32>,

    /// Reproject each leaf onto its cell's angular footprint
    #[arg(long)]
    pub distortion_correction: bool,

    /// Seed root cells with all entries or only the ones inside the cell
    #[arg(long)]
    pub root_candidates: Option<RootCandidates>,

    /// Catalog CSV with `id,x,y,z` rows
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Directory holding `<id>.png` images
    #[arg(long)]
    pub images: Option<PathBuf>,

    /// Parent directory of the `<title>/projection` tree
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Survey title
    #[arg(long)]
    pub title: Option<String>,

    /// Tile image format (jpeg or png)
    #[arg(long)]
    pub format: Option<TileFormat>,

    /// Worker threads
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=256))]
    pub threads: Option<u16>,

    /// Skip the Allsky mosaics
    #[arg(long)]
    pub no_mosaic: bool,

    /// Log at DEBUG level
    #[arg(long)]
    pub debug: bool,
}

impl GenerateArgs {
    /// Fold the command-line overrides into `config`.
    pub fn apply(&self, config: &mut ConfigFile) {
        if let Some(max_order) = self.max_order {
            config.pyramid.max_order = max_order;
        }
        if let Some(depth) = self.hierarchy_depth {
            config.pyramid.hierarchy_depth = depth;
        }
        if let Some(crop_size) = self.crop_size {
            config.pyramid.crop_size = crop_size;
        }
        if let Some(output_size) = self.output_size {
            config.pyramid.output_size = output_size;
        }
        if self.distortion_correction {
            config.pyramid.distortion_correction = true;
        }
        if let Some(candidates) = self.root_candidates {
            config.pyramid.root_candidates = candidates;
        }
        if let Some(catalog) = &self.catalog {
            config.input.catalog = Some(catalog.clone());
        }
        if let Some(images) = &self.images {
            config.input.images = Some(images.clone());
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
        if let Some(threads) = self.threads {
            config.generation.threads = threads as usize;
        }
    }
}

/// Run the generate command.
pub fn run(config_path: Option<&Path>, args: GenerateArgs) -> Result<(), CliError> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    let _logging = start_logging(&config, args.debug, "generate")?;

    let pyramid = PyramidConfig::from_config_file(&config);
    pyramid.validate()?;
    validate_title(&config.output.title)?;

    let catalog_path = config
        .input
        .catalog
        .as_deref()
        .ok_or(CliError::MissingInput("catalog"))?;
    let images_dir = config
        .input
        .images
        .as_deref()
        .ok_or(CliError::MissingInput("image directory"))?;

    let catalog = Catalog::load(catalog_path)?;
    let images = DirectoryImageStore::new(images_dir);

    let layout = OutputLayout::new(&config.output.directory, &config.output.title, pyramid.max_order());
    layout.prepare(args.force)?;

    let format = pyramid.tile_format();
    HipsProperties::new(&config.output.title, pyramid.max_order(), pyramid.tile_size())
        .with_tile_format(format)
        .write(layout.root())?;
    IndexPage::new(&config.output.title, &config.output.hipster_url, pyramid.max_order())
        .with_tile_format(format)
        .write(layout.root())?;

    let store = DiskTileStore::new(layout.root(), format);
    let sky = NestedHealpix;
    let summary = PyramidBuilder::new(pyramid, &sky, &catalog, &images)?
        .with_threads(config.generation.threads)
        .build(&store)?;

    if !args.no_mosaic {
        let mosaic = MosaicBuilder::new(pyramid.mosaic_edge());
        build_mosaics(pyramid.max_order(), &mosaic, &store)?;
    }

    println!(
        "Wrote {} tiles over {} orders to {} in {:.1}s",
        summary.total_tiles(),
        summary.orders.len(),
        layout.root().display(),
        summary.elapsed().as_secs_f64()
    );
    Ok(())
}

/// The title names a single directory below the output directory.
fn validate_title(title: &str) -> Result<(), CliError> {
    if title.trim().is_empty() {
        return Err(CliError::Config("title must not be empty".to_string()));
    }
    if title.contains(|c: char| c == '/' || c == '\\') || title == "." || title == ".." {
        return Err(CliError::Config(format!(
            "title '{}' must be a single directory name",
            title
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_only_given_flags() {
        let mut config = ConfigFile::default();
        let args = GenerateArgs {
            max_order: Some(1),
            hierarchy_depth: Some(3),
            title: Some("sky".to_string()),
            threads: Some(2),
            ..Default::default()
        };
        args.apply(&mut config);

        assert_eq!(config.pyramid.max_order, 1);
        assert_eq!(config.pyramid.hierarchy_depth, 3);
        assert_eq!(config.output.title, "sky");
        assert_eq!(config.generation.threads, 2);
        assert_eq!(config.pyramid.crop_size, ConfigFile::default().pyramid.crop_size);
        assert!(!config.pyramid.distortion_correction);
    }

    #[test]
    fn test_apply_distortion_flag_does_not_clear_config() {
        let mut config = ConfigFile::default();
        config.pyramid.distortion_correction = true;
        GenerateArgs::default().apply(&mut config);
        assert!(config.pyramid.distortion_correction);
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("survey").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("a/b").is_err());
        assert!(validate_title("a\\b").is_err());
        assert!(validate_title("..").is_err());
    }
}
