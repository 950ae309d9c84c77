//! Validated pyramid configuration.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::defaults::*;
use super::settings::ConfigFile;
use crate::output::TileFormat;
use crate::projection::ProjectorConfig;
use crate::sky::MAX_ORDER;
use crate::tile::{steps_for_depth, tile_side, MAX_TILE_SIZE};

/// Which catalog entries seed the recursion of each root cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootCandidates {
    /// Every catalog entry; the first internal level filters them by cell
    #[default]
    All,
    /// Only the entries falling inside the root cell
    Cell,
}

impl fmt::Display for RootCandidates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootCandidates::All => write!(f, "all"),
            RootCandidates::Cell => write!(f, "cell"),
        }
    }
}

impl FromStr for RootCandidates {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(RootCandidates::All),
            "cell" => Ok(RootCandidates::Cell),
            other => Err(format!("unknown root candidates '{}' (expected all or cell)", other)),
        }
    }
}

/// Rejected pyramid configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_order must be < {limit}, got {value}")]
    MaxOrder { value: u8, limit: u8 },

    #[error("hierarchy_depth must be >= 1")]
    HierarchyDepth,

    #[error("crop_size must be > 0")]
    CropSize,

    #[error("output_size must be a positive power of two, got {0}")]
    OutputSize(u32),

    #[error("mosaic_edge must be > 0")]
    MosaicEdge,

    #[error("tiles would be {size} pixels wide, beyond the supported {max}")]
    TileSize { size: u64, max: u32 },

    #[error("tiles would need order {order}, beyond the supported {max}")]
    OrderTooDeep { order: u32, max: u8 },
}

/// Typed configuration consumed by the pyramid builder.
///
/// # Example
///
/// ```
/// use hipster::config::{PyramidConfig, RootCandidates};
///
/// let config = PyramidConfig::default()
///     .with_max_order(2)
///     .with_hierarchy_depth(4)
///     .with_root_candidates(RootCandidates::Cell);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tile_size(), 512 * 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidConfig {
    max_order: u8,
    hierarchy_depth: u32,
    crop_size: u32,
    projection: ProjectorConfig,
    root_candidates: RootCandidates,
    tile_format: TileFormat,
    mosaic_edge: u32,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            max_order: DEFAULT_MAX_ORDER,
            hierarchy_depth: DEFAULT_HIERARCHY_DEPTH,
            crop_size: DEFAULT_CROP_SIZE,
            projection: ProjectorConfig::default(),
            root_candidates: RootCandidates::default(),
            tile_format: TileFormat::default(),
            mosaic_edge: DEFAULT_MOSAIC_EDGE,
        }
    }
}

impl PyramidConfig {
    /// Build from the loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let pyramid = &config.pyramid;
        Self {
            max_order: pyramid.max_order,
            hierarchy_depth: pyramid.hierarchy_depth,
            crop_size: pyramid.crop_size,
            projection: ProjectorConfig::default()
                .with_output_size(pyramid.output_size)
                .with_distortion_correction(pyramid.distortion_correction),
            root_candidates: pyramid.root_candidates,
            tile_format: config.output.tile_format,
            mosaic_edge: config.output.mosaic_edge,
        }
    }

    pub fn with_max_order(mut self, max_order: u8) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn with_hierarchy_depth(mut self, depth: u32) -> Self {
        self.hierarchy_depth = depth;
        self
    }

    pub fn with_crop_size(mut self, crop_size: u32) -> Self {
        self.crop_size = crop_size;
        self
    }

    pub fn with_output_size(mut self, output_size: u32) -> Self {
        self.projection = self.projection.with_output_size(output_size);
        self
    }

    pub fn with_distortion_correction(mut self, enabled: bool) -> Self {
        self.projection = self.projection.with_distortion_correction(enabled);
        self
    }

    pub fn with_root_candidates(mut self, candidates: RootCandidates) -> Self {
        self.root_candidates = candidates;
        self
    }

    pub fn with_tile_format(mut self, format: TileFormat) -> Self {
        self.tile_format = format;
        self
    }

    pub fn with_mosaic_edge(mut self, edge: u32) -> Self {
        self.mosaic_edge = edge;
        self
    }

    pub fn max_order(&self) -> u8 {
        self.max_order
    }

    pub fn hierarchy_depth(&self) -> u32 {
        self.hierarchy_depth
    }

    pub fn crop_size(&self) -> u32 {
        self.crop_size
    }

    pub fn projection(&self) -> ProjectorConfig {
        self.projection
    }

    pub fn output_size(&self) -> u32 {
        self.projection.output_size
    }

    pub fn distortion_correction(&self) -> bool {
        self.projection.distortion_correction
    }

    pub fn root_candidates(&self) -> RootCandidates {
        self.root_candidates
    }

    pub fn tile_format(&self) -> TileFormat {
        self.tile_format
    }

    pub fn mosaic_edge(&self) -> u32 {
        self.mosaic_edge
    }

    /// Side of every emitted tile: `output_size · 2^steps`.
    ///
    /// Exact for a config that passes [`validate`](Self::validate); larger
    /// sides saturate at `u32::MAX`.
    pub fn tile_size(&self) -> u32 {
        u32::try_from(tile_side(self.output_size(), self.hierarchy_depth)).unwrap_or(u32::MAX)
    }

    /// Check every constraint before any work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_order >= ORDER_LIMIT {
            return Err(ConfigError::MaxOrder {
                value: self.max_order,
                limit: ORDER_LIMIT,
            });
        }
        if self.hierarchy_depth == 0 {
            return Err(ConfigError::HierarchyDepth);
        }
        if self.crop_size == 0 {
            return Err(ConfigError::CropSize);
        }
        let output_size = self.output_size();
        if !output_size.is_power_of_two() {
            return Err(ConfigError::OutputSize(output_size));
        }
        if self.mosaic_edge == 0 {
            return Err(ConfigError::MosaicEdge);
        }

        let mut deepest = self.max_order as u32 + steps_for_depth(self.hierarchy_depth);
        if self.distortion_correction() {
            deepest += output_size.trailing_zeros();
        }
        if deepest > MAX_ORDER as u32 {
            return Err(ConfigError::OrderTooDeep {
                order: deepest,
                max: MAX_ORDER,
            });
        }

        let size = tile_side(output_size, self.hierarchy_depth);
        if size > MAX_TILE_SIZE as u64 {
            return Err(ConfigError::TileSize {
                size,
                max: MAX_TILE_SIZE,
            });
        }
        Ok(())
    }
}
