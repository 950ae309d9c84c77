//! Tile persistence.
//!
//! [`TileSink`] receives finished tiles; [`TileSource`] reads them back
//! (used by the Allsky mosaic). [`DiskTileStore`] implements both over the
//! HiPS directory layout, [`MemoryTileStore`] keeps tiles in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{ImageFormat, RgbImage};
use tracing::trace;

use super::{allsky_path, tile_path, TileFormat, TileStoreError};
use crate::sky::SkyCell;
use crate::tile::Tile;

/// Destination for finished tiles.
pub trait TileSink: Send + Sync {
    /// Store the tile of `cell`, replacing any previous one.
    fn write_tile(&self, cell: &SkyCell, tile: &Tile) -> Result<(), TileStoreError>;
}

/// Read access to stored tiles.
pub trait TileSource: Send + Sync {
    /// Read the tile of `cell`, or `None` if it was never written.
    fn read_tile(&self, cell: &SkyCell) -> Result<Option<Tile>, TileStoreError>;
}

/// Tile store over a HiPS directory tree.
#[derive(Debug, Clone)]
pub struct DiskTileStore {
    root: PathBuf,
    format: TileFormat,
}

impl DiskTileStore {
    pub fn new(root: impl Into<PathBuf>, format: TileFormat) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> TileFormat {
        self.format
    }

    /// Path a tile is stored at.
    pub fn path_for(&self, cell: &SkyCell) -> PathBuf {
        tile_path(&self.root, cell, self.format)
    }

    /// Save the Allsky mosaic of `order`, returning its path.
    pub fn write_mosaic(&self, order: u8, mosaic: &RgbImage) -> Result<PathBuf, TileStoreError> {
        let path = allsky_path(&self.root, order, self.format);
        self.save(&path, mosaic)?;
        Ok(path)
    }

    fn save(&self, path: &Path, image: &RgbImage) -> Result<(), TileStoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| TileStoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        image
            .save_with_format(path, image_format(self.format))
            .map_err(|source| TileStoreError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl TileSink for DiskTileStore {
    fn write_tile(&self, cell: &SkyCell, tile: &Tile) -> Result<(), TileStoreError> {
        let path = self.path_for(cell);
        trace!(cell = %cell, path = %path.display(), "Writing tile");
        self.save(&path, tile)
    }
}

impl TileSource for DiskTileStore {
    fn read_tile(&self, cell: &SkyCell) -> Result<Option<Tile>, TileStoreError> {
        let path = self.path_for(cell);
        if !path.is_file() {
            return Ok(None);
        }

        let image = image::open(&path).map_err(|source| TileStoreError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Some(image.to_rgb8()))
    }
}

fn image_format(format: TileFormat) -> ImageFormat {
    match format {
        TileFormat::Jpeg => ImageFormat::Jpeg,
        TileFormat::Png => ImageFormat::Png,
    }
}

/// In-memory tile store.
#[derive(Debug, Default)]
pub struct MemoryTileStore {
    tiles: Mutex<BTreeMap<SkyCell, Tile>>,
}

impl MemoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Cells stored so far, in order.
    pub fn cells(&self) -> Vec<SkyCell> {
        self.lock().keys().copied().collect()
    }

    pub fn get(&self, cell: &SkyCell) -> Option<Tile> {
        self.lock().get(cell).cloned()
    }

    pub fn remove(&self, cell: &SkyCell) -> Option<Tile> {
        self.lock().remove(cell)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<SkyCell, Tile>> {
        // A poisoned map still holds complete tiles
        self.tiles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TileSink for MemoryTileStore {
    fn write_tile(&self, cell: &SkyCell, tile: &Tile) -> Result<(), TileStoreError> {
        self.lock().insert(*cell, tile.clone());
        Ok(())
    }
}

impl TileSource for MemoryTileStore {
    fn read_tile(&self, cell: &SkyCell) -> Result<Option<Tile>, TileStoreError> {
        Ok(self.get(cell))
    }
}
