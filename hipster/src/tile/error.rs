//! Error types for tile construction.

use std::fmt;

use crate::dataset::ImageStoreError;
use crate::sky::SkyError;

/// Errors that can occur while embedding a tile.
#[derive(Debug)]
pub enum TileError {
    /// Cell id or order outside the pixelization
    InvalidCell(SkyError),
    /// Hierarchy depth must be at least 1
    InvalidDepth(u32),
    /// Deepest order touched by the recursion exceeds what the index supports
    OrderTooDeep {
        /// Order the recursion (or the distortion grid) would reach
        order: u32,
        /// Highest supported order
        max: u8,
    },
    /// Emitted tile side exceeds what the encoders accept
    TileTooLarge {
        /// Side the recursion would produce
        side: u64,
        /// Largest supported side
        max: u32,
    },
    /// Candidate index does not refer to a catalog entry
    UnknownEntry {
        /// Offending index
        index: usize,
        /// Catalog size
        len: usize,
    },
    /// Selected entry's image could not be loaded
    Image(ImageStoreError),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::InvalidCell(err) => write!(f, "{}", err),
            TileError::InvalidDepth(depth) => {
                write!(f, "Invalid hierarchy depth: {} (must be >= 1)", depth)
            }
            TileError::OrderTooDeep { order, max } => write!(
                f,
                "Tile recursion reaches order {} (must be <= {})",
                order, max
            ),
            TileError::TileTooLarge { side, max } => write!(
                f,
                "Tile side would be {} pixels (must be <= {})",
                side, max
            ),
            TileError::UnknownEntry { index, len } => write!(
                f,
                "Candidate index {} is outside the catalog ({} entries)",
                index, len
            ),
            TileError::Image(err) => write!(f, "Dataset image error: {}", err),
        }
    }
}

impl std::error::Error for TileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileError::InvalidCell(err) => Some(err),
            TileError::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SkyError> for TileError {
    fn from(err: SkyError) -> Self {
        TileError::InvalidCell(err)
    }
}

impl From<ImageStoreError> for TileError {
    fn from(err: ImageStoreError) -> Self {
        TileError::Image(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            TileError::InvalidDepth(0).to_string(),
            "Invalid hierarchy depth: 0 (must be >= 1)"
        );
        assert_eq!(
            TileError::UnknownEntry { index: 9, len: 3 }.to_string(),
            "Candidate index 9 is outside the catalog (3 entries)"
        );
    }

    #[test]
    fn test_from_sky_error_keeps_source() {
        use std::error::Error;

        let err: TileError = SkyError::InvalidOrder(40).into();
        assert!(matches!(err, TileError::InvalidCell(_)));
        assert!(err.source().is_some());
    }
}
