//! Dataset image access.
//!
//! The tile builder fetches the image of the entry it selects for a leaf
//! cell through the [`ImageStore`] trait. [`DirectoryImageStore`] reads
//! `<dir>/<id>.png`; [`MemoryImageStore`] holds images in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use thiserror::Error;
use tracing::trace;

/// Errors from image stores.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("No image for entry '{0}'")]
    NotFound(String),

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Read-only lookup of dataset images by entry id.
pub trait ImageStore: Send + Sync {
    /// Load the RGB image of an entry.
    fn load(&self, id: &str) -> Result<RgbImage, ImageStoreError>;
}

/// Image store backed by a directory of `<id>.<extension>` files.
#[derive(Debug, Clone)]
pub struct DirectoryImageStore {
    root: PathBuf,
    extension: String,
}

impl DirectoryImageStore {
    /// Create a store reading `<root>/<id>.png`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "png".to_string(),
        }
    }

    /// Use a different file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the image for an entry id.
    pub fn image_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", id, self.extension))
    }
}

impl ImageStore for DirectoryImageStore {
    fn load(&self, id: &str) -> Result<RgbImage, ImageStoreError> {
        let path = self.image_path(id);
        if !path.is_file() {
            return Err(ImageStoreError::NotFound(id.to_string()));
        }

        trace!(id, path = %path.display(), "Loading dataset image");

        // Alpha (if any) is dropped
        let image = image::open(&path).map_err(|source| ImageStoreError::Decode {
            path: path.clone(),
            source,
        })?;
        Ok(image.to_rgb8())
    }
}

/// In-memory image store.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: HashMap<String, RgbImage>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, image: RgbImage) {
        self.images.insert(id.into(), image);
    }

    pub fn with_image(mut self, id: impl Into<String>, image: RgbImage) -> Self {
        self.insert(id, image);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageStore for MemoryImageStore {
    fn load(&self, id: &str) -> Result<RgbImage, ImageStoreError> {
        self.images
            .get(id)
            .cloned()
            .ok_or_else(|| ImageStoreError::NotFound(id.to_string()))
    }
}

/// Crop the central `size × size` region of an image.
///
/// When the image is smaller than the crop along an axis, the missing border
/// is filled with black so the result is always `size × size`.
pub fn crop_center(image: &RgbImage, size: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == size && height == size {
        return image.clone();
    }

    if width >= size && height >= size {
        let left = (width - size) / 2;
        let top = (height - size) / 2;
        return image::imageops::crop_imm(image, left, top, size, size).to_image();
    }

    let left = (width as i64 - size as i64).div_euclid(2);
    let top = (height as i64 - size as i64).div_euclid(2);
    let mut out = RgbImage::from_pixel(size, size, Rgb([0, 0, 0]));
    image::imageops::replace(&mut out, image, -left, -top);
    out
}
