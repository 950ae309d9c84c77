//! Allsky mosaic assembly.
//!
//! All tiles of one order are shrunk to thumbnails and laid out row-major
//! on a near-square grid:
//!
//! ```text
//!   width  = floor(sqrt(12·4^order))
//!   height = ceil(12·4^order / width)
//!   cell i → column i mod width, row i div width
//! ```

use image::{imageops, Rgb, RgbImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::output::{TileSource, TileStoreError};
use crate::projection::RESIZE_FILTER;
use crate::sky::{cell_count, SkyCell, SkyError};

/// Default thumbnail edge in pixels.
pub const DEFAULT_EDGE: u32 = 64;

/// Errors from mosaic assembly.
#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("{0}")]
    InvalidOrder(#[from] SkyError),

    #[error("Tile {cell} is missing, cannot build the Allsky mosaic")]
    MissingTile { cell: SkyCell },

    #[error(transparent)]
    Store(#[from] TileStoreError),

    #[error("Thumbnail edge must be positive")]
    InvalidEdge,
}

/// Grid `(width, height)` in thumbnails for an order.
pub fn grid_dimensions(order: u8) -> (u32, u32) {
    let cells = cell_count(order);
    let width = (cells as f64).sqrt() as u64;
    let height = cells.div_ceil(width);
    (width as u32, height as u32)
}

/// Builds Allsky mosaics from stored tiles.
#[derive(Debug, Clone, Copy)]
pub struct MosaicBuilder {
    edge: u32,
}

impl Default for MosaicBuilder {
    fn default() -> Self {
        Self { edge: DEFAULT_EDGE }
    }
}

impl MosaicBuilder {
    pub fn new(edge: u32) -> Self {
        Self { edge }
    }

    pub fn edge(&self) -> u32 {
        self.edge
    }

    /// Assemble the mosaic of `order`.
    ///
    /// Every tile of the order must be present; the first missing one aborts
    /// the build. The part of the canvas not covered by a cell stays black.
    pub fn build(&self, order: u8, source: &dyn TileSource) -> Result<RgbImage, MosaicError> {
        if self.edge == 0 {
            return Err(MosaicError::InvalidEdge);
        }
        SkyCell::new(order, 0)?;

        let (width, height) = grid_dimensions(order);
        let mut canvas =
            RgbImage::from_pixel(width * self.edge, height * self.edge, Rgb([0, 0, 0]));

        for id in 0..cell_count(order) {
            let cell = SkyCell { order, id };
            let tile = source
                .read_tile(&cell)?
                .ok_or(MosaicError::MissingTile { cell })?;

            let thumbnail = if tile.dimensions() == (self.edge, self.edge) {
                tile
            } else {
                imageops::resize(&tile, self.edge, self.edge, RESIZE_FILTER)
            };

            let x = (id % width as u64) as u32 * self.edge;
            let y = (id / width as u64) as u32 * self.edge;
            imageops::replace(&mut canvas, &thumbnail, x as i64, y as i64);
        }

        debug!(order, width, height, edge = self.edge, "Mosaic assembled");
        info!(order, tiles = cell_count(order), "Built Allsky mosaic");
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{MemoryTileStore, TileSink};

    fn fill_order(store: &MemoryTileStore, order: u8, size: u32) {
        for id in 0..cell_count(order) {
            let tile = RgbImage::from_pixel(size, size, Rgb([(id % 12) as u8 * 20, 100, 50]));
            store.write_tile(&SkyCell { order, id }, &tile).unwrap();
        }
    }

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_dimensions(0), (3, 4));
        assert_eq!(grid_dimensions(1), (6, 8));
        assert_eq!(grid_dimensions(2), (13, 15));
        assert_eq!(grid_dimensions(3), (27, 29));
    }

    #[test]
    fn test_build_order_zero() {
        let store = MemoryTileStore::new();
        fill_order(&store, 0, 8);

        let mosaic = MosaicBuilder::new(4).build(0, &store).unwrap();

        assert_eq!(mosaic.dimensions(), (12, 16));
        // cell 5 → column 2, row 1
        assert_eq!(*mosaic.get_pixel(9, 5), Rgb([100, 100, 50]));
        // cell 11 → column 2, row 3
        assert_eq!(*mosaic.get_pixel(10, 14), Rgb([220, 100, 50]));
    }

    #[test]
    fn test_uncovered_area_is_black() {
        let store = MemoryTileStore::new();
        fill_order(&store, 2, 2);

        let mosaic = MosaicBuilder::new(2).build(2, &store).unwrap();

        // 192 cells on a 13×15 grid: the last row holds cells 182..191
        assert_eq!(mosaic.dimensions(), (26, 30));
        assert_eq!(*mosaic.get_pixel(25, 29), Rgb([0, 0, 0]));
        // cell 191 → column 9, row 14
        assert_eq!(*mosaic.get_pixel(19, 29), Rgb([220, 100, 50]));
    }

    #[test]
    fn test_missing_tile_is_fatal() {
        let store = MemoryTileStore::new();
        fill_order(&store, 0, 4);
        store.remove(&SkyCell { order: 0, id: 7 });

        let result = MosaicBuilder::default().build(0, &store);
        match result {
            Err(MosaicError::MissingTile { cell }) => assert_eq!(cell.id, 7),
            other => panic!("unexpected result: {:?}", other.map(|m| m.dimensions())),
        }
    }

    #[test]
    fn test_invalid_edge() {
        let store = MemoryTileStore::new();
        assert!(matches!(
            MosaicBuilder::new(0).build(0, &store),
            Err(MosaicError::InvalidEdge)
        ));
    }
}
