//! Pyramid generation driver.
//!
//! Orders are built one after another; inside an order every root cell is
//! embedded independently on a rayon thread pool and handed to the
//! [`TileSink`]. The Allsky pass reads the written tiles back through a
//! [`TileSource`].
//!
//! ```text
//!   for order in 0..=max_order            (sequential)
//!     ├── root candidates (all | per cell)
//!     └── par_iter cells 0..12·4^order    (thread pool)
//!           embed → write_tile
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::{ConfigError, PyramidConfig, RootCandidates};
use crate::dataset::ImageStore;
use crate::mosaic::{MosaicBuilder, MosaicError};
use crate::output::{DiskTileStore, TileSink, TileStoreError};
use crate::sky::{cell_count, SkyCell, SkyIndex};
use crate::tile::{CellAssigner, TileEmbedder, TileError};

/// Errors that abort a pyramid run.
#[derive(Debug, Error)]
pub enum PyramidError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Tile generation failed: {0}")]
    Tile(#[from] TileError),

    #[error("Tile storage failed: {0}")]
    Store(#[from] TileStoreError),

    #[error("Allsky mosaic failed: {0}")]
    Mosaic(#[from] MosaicError),

    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome of one order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub order: u8,
    pub tiles: u64,
    pub elapsed: Duration,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PyramidSummary {
    pub orders: Vec<OrderSummary>,
}

impl PyramidSummary {
    pub fn total_tiles(&self) -> u64 {
        self.orders.iter().map(|o| o.tiles).sum()
    }

    pub fn elapsed(&self) -> Duration {
        self.orders.iter().map(|o| o.elapsed).sum()
    }
}

/// Builds every order of a pyramid from one catalog.
pub struct PyramidBuilder<'a> {
    config: PyramidConfig,
    sky: &'a dyn SkyIndex,
    catalog: &'a Catalog,
    images: &'a dyn ImageStore,
    threads: Option<usize>,
}

impl<'a> PyramidBuilder<'a> {
    /// Create a builder, validating `config` up front.
    pub fn new(
        config: PyramidConfig,
        sky: &'a dyn SkyIndex,
        catalog: &'a Catalog,
        images: &'a dyn ImageStore,
    ) -> Result<Self, PyramidError> {
        config.validate()?;
        Ok(Self {
            config,
            sky,
            catalog,
            images,
            threads: None,
        })
    }

    /// Number of worker threads (default: rayon's choice, one per CPU).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    pub fn config(&self) -> &PyramidConfig {
        &self.config
    }

    /// Build orders `0..=max_order` into `sink`.
    pub fn build(&self, sink: &dyn TileSink) -> Result<PyramidSummary, PyramidError> {
        let pool = self.thread_pool()?;
        info!(
            entries = self.catalog.len(),
            max_order = self.config.max_order(),
            hierarchy_depth = self.config.hierarchy_depth(),
            tile_size = self.config.tile_size(),
            threads = pool.current_num_threads(),
            "Generating dataset projection"
        );

        let mut summary = PyramidSummary::default();
        for order in 0..=self.config.max_order() {
            let result = pool.install(|| self.build_order(order, sink))?;
            summary.orders.push(result);
        }

        info!(
            tiles = summary.total_tiles(),
            elapsed_ms = summary.elapsed().as_millis() as u64,
            "Dataset projection complete"
        );
        Ok(summary)
    }

    /// Build all tiles of one order into `sink`.
    ///
    /// Runs on the current rayon pool.
    pub fn build_order(&self, order: u8, sink: &dyn TileSink) -> Result<OrderSummary, PyramidError> {
        let start = Instant::now();
        let cells = cell_count(order);
        let depth = self.config.hierarchy_depth();
        info!(order, tiles = cells, "Building order");

        let embedder = TileEmbedder::new(
            self.sky,
            self.catalog,
            self.images,
            self.config.projection(),
            self.config.crop_size(),
        );
        embedder.validate(order, depth)?;

        let all = self.catalog.indices();
        let per_cell = match self.config.root_candidates() {
            RootCandidates::All => None,
            RootCandidates::Cell => {
                Some(CellAssigner::new(self.sky, self.catalog).assign_all(order, &all)?)
            }
        };

        (0..cells).into_par_iter().try_for_each(|id| {
            let candidates: &[usize] = match &per_cell {
                None => &all,
                Some(assignment) => assignment.get(&id).map(Vec::as_slice).unwrap_or(&[]),
            };

            let tile = embedder.embed(order, id, depth, candidates)?;
            sink.write_tile(&SkyCell { order, id }, &tile)?;
            debug!(order, cell = id, "Tile written");
            Ok::<(), PyramidError>(())
        })?;

        let elapsed = start.elapsed();
        info!(
            order,
            tiles = cells,
            elapsed_ms = elapsed.as_millis() as u64,
            "Order complete"
        );
        Ok(OrderSummary {
            order,
            tiles: cells,
            elapsed,
        })
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool, PyramidError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        Ok(builder.build()?)
    }
}

/// Build and save the Allsky mosaic of every order up to `max_order`.
///
/// Returns the written paths in order.
pub fn build_mosaics(
    max_order: u8,
    mosaic: &MosaicBuilder,
    store: &DiskTileStore,
) -> Result<Vec<PathBuf>, PyramidError> {
    let mut paths = Vec::with_capacity(max_order as usize + 1);
    for order in 0..=max_order {
        let image = mosaic.build(order, store)?;
        let path = store.write_mosaic(order, &image)?;
        info!(order, path = %path.display(), "Wrote Allsky mosaic");
        paths.push(path);
    }
    Ok(paths)
}
