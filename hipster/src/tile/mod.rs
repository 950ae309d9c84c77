//! Recursive tile construction.
//!
//! A tile for sky cell `(order, id)` is built by walking the quadtree of its
//! descendant cells down to the requested depth:
//!
//! ```text
//!                    embed(o, p, d)
//!                          │
//!            ┌─────────────┴─────────────┐
//!            │ d ≤ 1                     │ d > 1
//!            ▼                           ▼
//!   ┌──────────────────┐     ┌──────────────────────────┐
//!   │ Leaf             │     │ Internal                 │
//!   │ nearest entry    │     │ assign at o+1 to 4p..4p+3│
//!   │ crop + project   │     │ embed(o+1, 4p+i, d/2)    │
//!   │ or background    │     │ compose quadrants        │
//!   └──────────────────┘     └──────────────────────────┘
//! ```
//!
//! Children are composed with `4p` top-left, `4p+1` bottom-left, `4p+2`
//! top-right and `4p+3` bottom-right.

mod assign;
mod embed;
mod error;

pub use assign::{children, Assignment, CellAssigner};
pub use embed::{steps_for_depth, tile_side, TileEmbedder};
pub use error::TileError;

use image::{imageops, Rgb, RgbImage};

/// A square RGB raster tile.
pub type Tile = RgbImage;

/// Largest tile side the JPEG encoder accepts.
pub const MAX_TILE_SIZE: u32 = 65_535;

/// Color of a tile with no dataset entry.
pub const BACKGROUND: Rgb<u8> = Rgb([77, 0, 153]);

/// Solid background tile of side `size`.
pub fn background_tile(size: u32) -> Tile {
    RgbImage::from_pixel(size, size, BACKGROUND)
}

/// Compose four equal-sized child tiles into one of double side.
///
/// `quadrants` holds the children in nested order: top-left, bottom-left,
/// top-right, bottom-right.
pub fn compose_quadrants(quadrants: [Tile; 4]) -> Tile {
    let (width, height) = quadrants[0].dimensions();
    let mut canvas = RgbImage::new(width * 2, height * 2);

    let offsets = [(0, 0), (0, height), (width, 0), (width, height)];
    for (tile, (x, y)) in quadrants.iter().zip(offsets) {
        imageops::replace(&mut canvas, tile, x as i64, y as i64);
    }

    canvas
}
