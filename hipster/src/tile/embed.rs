//! Recursive embedder producing one raster tile per sky cell.

use tracing::debug;

use super::{
    background_tile, children, compose_quadrants, CellAssigner, Tile, TileError, MAX_TILE_SIZE,
};
use crate::catalog::{Catalog, CatalogEntry};
use crate::dataset::{crop_center, ImageStore};
use crate::projection::{Projector, ProjectorConfig};
use crate::sky::{distance_squared, SkyCell, SkyIndex, MAX_ORDER};

/// Number of internal (compositing) levels for a hierarchy depth.
///
/// The depth is halved as a real number until it is at most 1, so any
/// depth `>= 1` is accepted: 1 → 0, 2 → 1, 3 → 2, 4 → 2, 5 → 3.
pub fn steps_for_depth(depth: u32) -> u32 {
    let mut remaining = depth as f64;
    let mut steps = 0;
    while remaining > 1.0 {
        remaining /= 2.0;
        steps += 1;
    }
    steps
}

/// Side of a tile `depth` levels above leaves of `output_size`.
///
/// Computed in `u64`, so oversized combinations stay visible instead of
/// wrapping.
pub fn tile_side(output_size: u32, depth: u32) -> u64 {
    (output_size as u64) << steps_for_depth(depth)
}

/// Builds tiles by recursive nearest-entry selection and compositing.
pub struct TileEmbedder<'a> {
    sky: &'a dyn SkyIndex,
    catalog: &'a Catalog,
    images: &'a dyn ImageStore,
    projector: Projector<'a>,
    crop_size: u32,
}

impl<'a> TileEmbedder<'a> {
    pub fn new(
        sky: &'a dyn SkyIndex,
        catalog: &'a Catalog,
        images: &'a dyn ImageStore,
        projection: ProjectorConfig,
        crop_size: u32,
    ) -> Self {
        Self {
            sky,
            catalog,
            images,
            projector: Projector::new(sky, projection),
            crop_size,
        }
    }

    /// Side length of tiles produced for `depth`.
    pub fn tile_size(&self, depth: u32) -> u64 {
        tile_side(self.projector.config().output_size, depth)
    }

    /// Check that a tile of `order` and `depth` can be built.
    ///
    /// Fails when the depth is zero, when the recursion (plus the fine
    /// distortion grid, if enabled) would go past [`MAX_ORDER`], or when the
    /// tile side would exceed [`MAX_TILE_SIZE`].
    pub fn validate(&self, order: u8, depth: u32) -> Result<(), TileError> {
        if depth == 0 {
            return Err(TileError::InvalidDepth(depth));
        }

        let config = self.projector.config();
        let mut deepest = order as u32 + steps_for_depth(depth);
        if config.distortion_correction {
            deepest += config.output_size.trailing_zeros();
        }
        if deepest > MAX_ORDER as u32 {
            return Err(TileError::OrderTooDeep {
                order: deepest,
                max: MAX_ORDER,
            });
        }

        let side = self.tile_size(depth);
        if side > MAX_TILE_SIZE as u64 {
            return Err(TileError::TileTooLarge {
                side,
                max: MAX_TILE_SIZE,
            });
        }
        Ok(())
    }

    /// Build the tile of `cell` at `order` from `candidates`.
    ///
    /// `candidates` are catalog indices; the ones outside `cell` are
    /// filtered out at the first internal level, while a leaf uses every
    /// candidate it is given.
    pub fn embed(
        &self,
        order: u8,
        cell: u64,
        depth: u32,
        candidates: &[usize],
    ) -> Result<Tile, TileError> {
        SkyCell::new(order, cell)?;
        self.validate(order, depth)?;
        if let Some(&index) = candidates.iter().find(|&&i| i >= self.catalog.len()) {
            return Err(TileError::UnknownEntry {
                index,
                len: self.catalog.len(),
            });
        }

        self.embed_node(order, cell, depth as f64, candidates)
    }

    /// Index of the candidate nearest to the center of `cell`.
    ///
    /// Ties go to the candidate listed first.
    pub fn nearest(
        &self,
        order: u8,
        cell: u64,
        candidates: &[usize],
    ) -> Result<Option<usize>, TileError> {
        let center = self.sky.cell_to_vector(order, cell);
        let mut best: Option<(usize, f64)> = None;

        for &index in candidates {
            let entry = self.entry(index)?;
            let distance = distance_squared(&entry.position, &center);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }

        Ok(best.map(|(index, _)| index))
    }

    fn embed_node(
        &self,
        order: u8,
        cell: u64,
        depth: f64,
        candidates: &[usize],
    ) -> Result<Tile, TileError> {
        if depth <= 1.0 {
            return self.embed_leaf(order, cell, candidates);
        }

        let child_order = order + 1;
        let child_cells = children(cell);
        let assignment =
            CellAssigner::new(self.sky, self.catalog).assign(child_order, candidates, &child_cells)?;

        let embed_child = |child: u64| {
            let child_candidates = assignment.get(&child).map(Vec::as_slice).unwrap_or(&[]);
            self.embed_node(child_order, child, depth / 2.0, child_candidates)
        };

        let [c0, c1, c2, c3] = child_cells;
        Ok(compose_quadrants([
            embed_child(c0)?,
            embed_child(c1)?,
            embed_child(c2)?,
            embed_child(c3)?,
        ]))
    }

    fn embed_leaf(&self, order: u8, cell: u64, candidates: &[usize]) -> Result<Tile, TileError> {
        let Some(index) = self.nearest(order, cell, candidates)? else {
            debug!(order, cell, "No candidates, using background tile");
            return Ok(background_tile(self.projector.config().output_size));
        };

        let entry = self.entry(index)?;
        debug!(
            order,
            cell,
            entry = %entry.id,
            candidates = candidates.len(),
            "Embedding nearest entry"
        );

        let image = self.images.load(&entry.id)?;
        let cropped = crop_center(&image, self.crop_size);
        Ok(self.projector.project(&cropped, order, cell))
    }

    fn entry(&self, index: usize) -> Result<&'a CatalogEntry, TileError> {
        self.catalog.get(index).ok_or(TileError::UnknownEntry {
            index,
            len: self.catalog.len(),
        })
    }
}
