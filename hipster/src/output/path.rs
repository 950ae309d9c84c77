//! HiPS tile path construction.

use std::path::{Path, PathBuf};

use super::TileFormat;
use crate::sky::SkyCell;

/// Directory holding all tiles of one order.
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use hipster::output::order_directory;
///
/// assert_eq!(
///     order_directory(Path::new("/hips"), 3),
///     PathBuf::from("/hips/Norder3")
/// );
/// ```
pub fn order_directory(root: &Path, order: u8) -> PathBuf {
    root.join(format!("Norder{}", order))
}

/// Bucket directory holding up to 10000 tiles of one order.
pub fn bucket_directory(root: &Path, order: u8, bucket: u64) -> PathBuf {
    order_directory(root, order).join(format!("Dir{}", bucket))
}

/// Path of one tile.
///
/// Creates a bucketed path structure:
/// ```text
/// <root>/Norder<order>/Dir<floor(id/10000)*10000>/Npix<id>.<ext>
/// ```
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use hipster::output::{tile_path, TileFormat};
/// use hipster::sky::SkyCell;
///
/// let cell = SkyCell::new(4, 12_345).unwrap();
/// assert_eq!(
///     tile_path(Path::new("/hips"), &cell, TileFormat::Jpeg),
///     PathBuf::from("/hips/Norder4/Dir10000/Npix12345.jpg")
/// );
/// ```
pub fn tile_path(root: &Path, cell: &SkyCell, format: TileFormat) -> PathBuf {
    bucket_directory(root, cell.order, cell.dir_bucket())
        .join(format!("Npix{}.{}", cell.id, format.extension()))
}

/// Path of the Allsky mosaic of one order.
pub fn allsky_path(root: &Path, order: u8, format: TileFormat) -> PathBuf {
    order_directory(root, order).join(format!("Allsky.{}", format.extension()))
}
