//! Projection of a selected source image onto a tile.
//!
//! Two modes are supported:
//!
//! - **Resize** (default): antialiased triangle-filter resize to
//!   `output_size × output_size`.
//! - **Distortion correction**: every output pixel samples the source at
//!   the angular offset of its fine cell from the tile center (see
//!   [`distortion`]).

pub mod distortion;
mod nested_grid;

pub use nested_grid::NestedGrid;

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::trace;

use crate::sky::SkyIndex;
use crate::tile::Tile;

/// Default tile side in pixels.
pub const DEFAULT_OUTPUT_SIZE: u32 = 512;

/// Filter used for every antialiased resize.
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Projection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectorConfig {
    /// Side of a leaf tile in pixels
    pub output_size: u32,
    /// Use the angle-aware remap instead of a plain resize
    pub distortion_correction: bool,
    /// Remap rows in parallel
    pub parallel: bool,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            output_size: DEFAULT_OUTPUT_SIZE,
            distortion_correction: false,
            parallel: true,
        }
    }
}

impl ProjectorConfig {
    pub fn with_output_size(mut self, output_size: u32) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn with_distortion_correction(mut self, enabled: bool) -> Self {
        self.distortion_correction = enabled;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Maps source images onto cell footprints.
#[derive(Clone, Copy)]
pub struct Projector<'a> {
    sky: &'a dyn SkyIndex,
    config: ProjectorConfig,
}

impl<'a> Projector<'a> {
    pub fn new(sky: &'a dyn SkyIndex, config: ProjectorConfig) -> Self {
        Self { sky, config }
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Project `image` onto cell `cell` at `order`.
    pub fn project(&self, image: &RgbImage, order: u8, cell: u64) -> Tile {
        let size = self.config.output_size;
        trace!(
            order,
            cell,
            distortion = self.config.distortion_correction,
            "Projecting image"
        );

        if self.config.distortion_correction {
            distortion::remap(self.sky, image, order, cell, size, self.config.parallel)
        } else {
            imageops::resize(image, size, size, RESIZE_FILTER)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::NestedHealpix;
    use image::Rgb;

    fn checkerboard(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, y| {
            if (x / 3 + y / 5) % 2 == 0 {
                Rgb([250, 30, 10])
            } else {
                Rgb([5, 90, 220])
            }
        })
    }

    #[test]
    fn test_resize_matches_plain_resize() {
        let hp = NestedHealpix;
        let projector = Projector::new(&hp, ProjectorConfig::default().with_output_size(16));
        let source = checkerboard(37);

        let projected = projector.project(&source, 2, 100);
        let expected = imageops::resize(&source, 16, 16, FilterType::Triangle);
        assert_eq!(projected, expected);
    }

    #[test]
    fn test_output_size() {
        let hp = NestedHealpix;
        let source = checkerboard(20);
        for distortion in [false, true] {
            let config = ProjectorConfig::default()
                .with_output_size(8)
                .with_distortion_correction(distortion);
            let tile = Projector::new(&hp, config).project(&source, 0, 3);
            assert_eq!(tile.dimensions(), (8, 8));
        }
    }

    #[test]
    fn test_distortion_uses_remap() {
        let hp = NestedHealpix;
        let config = ProjectorConfig::default()
            .with_output_size(4)
            .with_distortion_correction(true)
            .with_parallel(false);
        let source = checkerboard(12);

        let tile = Projector::new(&hp, config).project(&source, 1, 20);
        assert_eq!(tile, distortion::remap(&hp, &source, 1, 20, 4, false));
    }

    #[test]
    fn test_default_config() {
        let config = ProjectorConfig::default();
        assert_eq!(config.output_size, 512);
        assert!(!config.distortion_correction);
        assert!(config.parallel);
    }
}
