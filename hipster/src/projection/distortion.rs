//! Angle-aware local remap of a source image onto a cell footprint.
//!
//! Each output pixel is identified with one fine cell of the tile (see
//! [`NestedGrid`]). Its angular offset from the tile center is converted to
//! source pixel coordinates with a small-angle approximation:
//!
//! ```text
//!   Δθ = θt − θc
//!   Δφ = (φt − φc) · sin θt              (φt − φc − 2π when φc = 0, φt > π)
//!   src = size/2 + Δ / halfWidth · (size/2 − 1)
//! ```
//!
//! `Δφ` selects the source row and `Δθ` the source column.
//!
//! Pixels whose source coordinate falls outside the image stay black.

use std::f64::consts::{PI, TAU};

use image::{Rgb, RgbImage};
use rayon::prelude::*;

use super::NestedGrid;
use crate::sky::SkyIndex;

/// Angular half-width of a cell footprint at `order`.
#[inline]
pub fn half_width(order: u8) -> f64 {
    PI / (4.0 * (1u64 << order) as f64) / 2.0
}

/// Offset `(Δθ, Δφ)` of a target angle from a center angle.
///
/// `Δφ` is scaled by `sin θt`. A center on the `φ = 0` seam with a target
/// past `π` is measured across the seam.
pub fn angular_offset(center: (f64, f64), target: (f64, f64)) -> (f64, f64) {
    let (center_theta, center_phi) = center;
    let (target_theta, target_phi) = target;

    let delta_theta = target_theta - center_theta;
    let delta_phi = if center_phi == 0.0 && target_phi > PI {
        (target_phi - center_phi - TAU) * target_theta.sin()
    } else {
        (target_phi - center_phi) * target_theta.sin()
    };
    (delta_theta, delta_phi)
}

/// Source pixel coordinate along one axis of length `size`.
///
/// Truncates toward zero; the result may be out of range.
#[inline]
pub fn source_coordinate(delta: f64, half_width: f64, size: u32) -> i64 {
    let half = (size / 2) as f64;
    (half + delta / half_width * (half - 1.0)) as i64
}

/// Remap `image` onto the footprint of `cell` at `order`.
///
/// `output_size` must be a power of two. Rows are processed in parallel
/// when `parallel` is set.
pub fn remap(
    sky: &dyn SkyIndex,
    image: &RgbImage,
    order: u8,
    cell: u64,
    output_size: u32,
    parallel: bool,
) -> RgbImage {
    let grid = NestedGrid::build(output_size, cell);
    let fine_order = order + output_size.trailing_zeros() as u8;
    let center = sky.cell_to_angle(order, cell);
    let half_width = half_width(order);
    let (width, height) = image.dimensions();

    let mut out = RgbImage::from_pixel(output_size, output_size, Rgb([0, 0, 0]));
    let row_len = output_size as usize * 3;

    let fill_row = |(y, row): (usize, &mut [u8])| {
        for (x, &fine) in grid.row(y as u32).iter().enumerate() {
            let target = sky.cell_to_angle(fine_order, fine);
            let (delta_theta, delta_phi) = angular_offset(center, target);
            let src_row = source_coordinate(delta_phi, half_width, height);
            let src_col = source_coordinate(delta_theta, half_width, width);

            if (0..width as i64).contains(&src_col) && (0..height as i64).contains(&src_row) {
                let pixel = image.get_pixel(src_col as u32, src_row as u32);
                row[x * 3..x * 3 + 3].copy_from_slice(&pixel.0);
            }
        }
    };

    let buffer: &mut [u8] = &mut out;
    if parallel {
        buffer.par_chunks_mut(row_len).enumerate().for_each(fill_row);
    } else {
        buffer.chunks_mut(row_len).enumerate().for_each(fill_row);
    }

    out
}
