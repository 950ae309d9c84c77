//! Output directory scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{bucket_directory, order_directory, LayoutError};
use crate::sky::cell_count;

/// Name of the tile tree below `<output_dir>/<title>`.
pub const PROJECTION_DIR: &str = "projection";

/// The `<output_dir>/<title>/projection` tree of one run.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    max_order: u8,
}

impl OutputLayout {
    pub fn new(output_dir: &Path, title: &str, max_order: u8) -> Self {
        Self {
            root: output_dir.join(title).join(PROJECTION_DIR),
            max_order,
        }
    }

    /// Root of the tile tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_order(&self) -> u8 {
        self.max_order
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    pub fn properties_path(&self) -> PathBuf {
        self.root.join("properties")
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join("index.html")
    }

    /// Create the tile tree, every `Norder<i>` and its `Dir<j>` buckets.
    ///
    /// An existing tree is only removed when `force` is set; otherwise
    /// [`LayoutError::AlreadyExists`] is returned and nothing is touched.
    pub fn prepare(&self, force: bool) -> Result<(), LayoutError> {
        if self.exists() {
            if !force {
                return Err(LayoutError::AlreadyExists(self.root.clone()));
            }
            warn!(path = %self.root.display(), "Removing existing output directory");
            fs::remove_dir_all(&self.root).map_err(|source| LayoutError::Remove {
                path: self.root.clone(),
                source,
            })?;
        }

        let mut created = 0usize;
        for order in 0..=self.max_order {
            let last_bucket = cell_count(order) / 10_000;
            for bucket in 0..=last_bucket {
                let dir = bucket_directory(&self.root, order, bucket * 10_000);
                fs::create_dir_all(&dir)
                    .map_err(|source| LayoutError::CreateDir { path: dir, source })?;
                created += 1;
            }
        }

        info!(
            path = %self.root.display(),
            max_order = self.max_order,
            buckets = created,
            "Prepared output directory"
        );
        Ok(())
    }

    /// Directory of one order.
    pub fn order_directory(&self, order: u8) -> PathBuf {
        order_directory(&self.root, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path() {
        let layout = OutputLayout::new(Path::new("/data/hips"), "galaxies", 2);
        assert_eq!(layout.root(), Path::new("/data/hips/galaxies/projection"));
        assert_eq!(
            layout.properties_path(),
            PathBuf::from("/data/hips/galaxies/projection/properties")
        );
    }

    #[test]
    fn test_prepare_creates_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "survey", 1);

        layout.prepare(false).unwrap();

        assert!(layout.root().join("Norder0/Dir0").is_dir());
        assert!(layout.root().join("Norder1/Dir0").is_dir());
        assert!(!layout.root().join("Norder2").exists());
    }

    #[test]
    fn test_prepare_multiple_buckets() {
        let dir = tempfile::tempdir().unwrap();
        // Order 5 has 12288 cells
        let layout = OutputLayout::new(dir.path(), "survey", 5);

        layout.prepare(false).unwrap();

        assert!(layout.root().join("Norder5/Dir10000").is_dir());
        assert!(!layout.root().join("Norder5/Dir20000").exists());
        assert!(!layout.root().join("Norder4/Dir10000").exists());
    }

    #[test]
    fn test_prepare_refuses_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "survey", 0);
        layout.prepare(false).unwrap();
        let marker = layout.root().join("keep.txt");
        fs::write(&marker, "x").unwrap();

        let result = layout.prepare(false);

        assert!(matches!(result, Err(LayoutError::AlreadyExists(_))));
        assert!(marker.exists());
    }

    #[test]
    fn test_prepare_force_recreates() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "survey", 0);
        layout.prepare(false).unwrap();
        let marker = layout.root().join("old.txt");
        fs::write(&marker, "x").unwrap();

        layout.prepare(true).unwrap();

        assert!(!marker.exists());
        assert!(layout.root().join("Norder0/Dir0").is_dir());
    }
}
