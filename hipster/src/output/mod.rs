//! HiPS output: directory layout, tile stores and metadata files.
//!
//! ```text
//! <output_dir>/<title>/projection/
//! ├── properties
//! ├── index.html
//! ├── Norder0/
//! │   ├── Allsky.jpg
//! │   └── Dir0/Npix0.jpg … Npix11.jpg
//! └── Norder1/ …
//! ```

mod layout;
mod path;
mod properties;
mod store;

pub use layout::{OutputLayout, PROJECTION_DIR};
pub use path::{allsky_path, bucket_directory, order_directory, tile_path};
pub use properties::{HipsProperties, IndexPage};
pub use store::{DiskTileStore, MemoryTileStore, TileSink, TileSource};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Errors from reading or writing tiles.
#[derive(Debug, Error)]
pub enum TileStoreError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write tile {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to read tile {path}: {source}")]
    Read {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Errors from preparing the output directory or writing metadata.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Output directory {0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Encoding of stored tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileFormat {
    #[default]
    Jpeg,
    Png,
}

impl TileFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Jpeg => "jpg",
            TileFormat::Png => "png",
        }
    }

    /// Name used in the HiPS `hips_tile_format` property.
    pub fn hips_name(&self) -> &'static str {
        match self {
            TileFormat::Jpeg => "jpeg",
            TileFormat::Png => "png",
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hips_name())
    }
}

impl FromStr for TileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(TileFormat::Jpeg),
            "png" => Ok(TileFormat::Png),
            other => Err(format!("unknown tile format '{}' (expected jpeg or png)", other)),
        }
    }
}
