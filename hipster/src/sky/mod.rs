//! Sky pixelization module
//!
//! Provides the [`SkyIndex`] abstraction used by the tile builder to move
//! between unit-sphere vectors, nested cell ids and cell-center angles, plus
//! the HEALPix implementation used in production.
//!
//! Every implementation must honour nested containment: the children of
//! cell `p` at order `o` are the cells `4p..4p+3` at order `o + 1`.

mod healpix;
mod types;

pub use healpix::NestedHealpix;
pub use types::{cell_count, SkyCell, SkyError, Vec3, BASE_CELLS, MAX_ORDER};

/// Conversions between sphere positions and nested sky cells.
///
/// Callers validate orders and cell ids up front (see [`SkyCell::new`]), so
/// implementations may assume their inputs are in range.
pub trait SkyIndex: Send + Sync {
    /// Cell at `order` containing the (not necessarily normalized) `vector`.
    fn vector_to_cell(&self, order: u8, vector: &Vec3) -> u64;

    /// Unit vector of the cell center.
    fn cell_to_vector(&self, order: u8, cell: u64) -> Vec3;

    /// Cell center as `(theta, phi)`: colatitude in `[0, π]`, longitude in `[0, 2π)`.
    fn cell_to_angle(&self, order: u8, cell: u64) -> (f64, f64);
}

impl<T: SkyIndex + ?Sized> SkyIndex for std::sync::Arc<T> {
    fn vector_to_cell(&self, order: u8, vector: &Vec3) -> u64 {
        (**self).vector_to_cell(order, vector)
    }

    fn cell_to_vector(&self, order: u8, cell: u64) -> Vec3 {
        (**self).cell_to_vector(order, cell)
    }

    fn cell_to_angle(&self, order: u8, cell: u64) -> (f64, f64) {
        (**self).cell_to_angle(order, cell)
    }
}

/// Squared Euclidean distance between two vectors.
#[inline]
pub fn distance_squared(a: &Vec3, b: &Vec3) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}
