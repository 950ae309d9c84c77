//! Sky cell type definitions

use std::fmt;

/// Highest order the nested numbering can address in a `u64` cell id.
pub const MAX_ORDER: u8 = 29;

/// Number of base cells at order 0.
pub const BASE_CELLS: u64 = 12;

/// A unit-sphere position `[x, y, z]`.
pub type Vec3 = [f64; 3];

/// Number of cells at the given order: `12 · 4^order`.
#[inline]
pub fn cell_count(order: u8) -> u64 {
    BASE_CELLS << (2 * order as u32)
}

/// One cell of the nested sky pixelization.
///
/// The four children of `(o, p)` are `(o+1, 4p) … (o+1, 4p+3)`, so a
/// cell's subtree can be walked without re-indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkyCell {
    /// Resolution order (0 = the 12 base cells)
    pub order: u8,
    /// Nested cell id in `[0, 12·4^order)`
    pub id: u64,
}

impl SkyCell {
    /// Create a validated sky cell.
    pub fn new(order: u8, id: u64) -> Result<Self, SkyError> {
        if order > MAX_ORDER {
            return Err(SkyError::InvalidOrder(order));
        }
        if id >= cell_count(order) {
            return Err(SkyError::InvalidCell { order, id });
        }
        Ok(Self { order, id })
    }

    /// The four child cells, in nested order.
    #[inline]
    pub fn children(&self) -> [SkyCell; 4] {
        let order = self.order + 1;
        let first = self.id * 4;
        [
            SkyCell { order, id: first },
            SkyCell { order, id: first + 1 },
            SkyCell { order, id: first + 2 },
            SkyCell { order, id: first + 3 },
        ]
    }

    /// The cell containing this one at `order - 1`, if any.
    #[inline]
    pub fn parent(&self) -> Option<SkyCell> {
        if self.order == 0 {
            return None;
        }
        Some(SkyCell {
            order: self.order - 1,
            id: self.id / 4,
        })
    }

    /// Directory bucket used by the HiPS layout (`Dir<bucket>`).
    #[inline]
    pub fn dir_bucket(&self) -> u64 {
        (self.id / 10_000) * 10_000
    }
}

impl fmt::Display for SkyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Norder{}/Npix{}", self.order, self.id)
    }
}

/// Errors for sky cell construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SkyError {
    /// Order beyond what the nested numbering supports
    InvalidOrder(u8),
    /// Cell id outside `[0, 12·4^order)`
    InvalidCell { order: u8, id: u64 },
}

impl fmt::Display for SkyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkyError::InvalidOrder(order) => {
                write!(f, "Invalid order: {} (must be <= {})", order, MAX_ORDER)
            }
            SkyError::InvalidCell { order, id } => write!(
                f,
                "Invalid cell {} at order {} (must be < {})",
                id,
                order,
                cell_count(*order)
            ),
        }
    }
}

impl std::error::Error for SkyError {}
