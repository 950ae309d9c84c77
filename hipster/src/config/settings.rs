//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use super::RootCandidates;
use crate::output::TileFormat;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Pyramid geometry and projection
    pub pyramid: PyramidSettings,
    /// Output tree and metadata
    pub output: OutputSettings,
    /// Dataset inputs
    pub input: InputSettings,
    /// Parallelism
    pub generation: GenerationSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[pyramid]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidSettings {
    /// Deepest order written (must be < 10)
    pub max_order: u8,
    /// Number of tile levels folded into one tile
    pub hierarchy_depth: u32,
    /// Side of the center crop applied to dataset images
    pub crop_size: u32,
    /// Side of a leaf tile (power of two)
    pub output_size: u32,
    /// Reproject leaves onto their angular footprint
    pub distortion_correction: bool,
    /// Which entries seed each root cell
    pub root_candidates: RootCandidates,
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Parent of the `<title>/projection` tree
    pub directory: PathBuf,
    /// Survey title, also the directory name
    pub title: String,
    pub tile_format: TileFormat,
    /// Thumbnail edge in the Allsky mosaic
    pub mosaic_edge: u32,
    /// Base URL used by the preview page
    pub hipster_url: String,
}

/// `[input]` section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSettings {
    /// Catalog CSV (`id,x,y,z`)
    pub catalog: Option<PathBuf>,
    /// Directory of `<id>.png` images
    pub images: Option<PathBuf>,
}

/// `[generation]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Worker threads for root-cell parallelism
    pub threads: usize,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
