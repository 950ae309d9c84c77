//! hipster - HiPS image pyramid builder
//!
//! Turns a catalog of images placed on the unit sphere into a Hierarchical
//! Progressive Survey: for each order every HEALPix cell gets a tile showing
//! the dataset image closest to the cell center, optionally reprojected onto
//! the cell's angular footprint.
//!
//! # Example
//!
//! ```no_run
//! use hipster::catalog::Catalog;
//! use hipster::config::PyramidConfig;
//! use hipster::dataset::DirectoryImageStore;
//! use hipster::output::{DiskTileStore, OutputLayout, TileFormat};
//! use hipster::pipeline::PyramidBuilder;
//! use hipster::sky::NestedHealpix;
//! use std::path::Path;
//!
//! let catalog = Catalog::load(Path::new("catalog.csv"))?;
//! let images = DirectoryImageStore::new("images");
//! let config = PyramidConfig::default().with_max_order(2);
//!
//! let layout = OutputLayout::new(Path::new("out"), "survey", config.max_order());
//! layout.prepare(false)?;
//! let store = DiskTileStore::new(layout.root(), TileFormat::Jpeg);
//!
//! let sky = NestedHealpix;
//! PyramidBuilder::new(config, &sky, &catalog, &images)?.build(&store)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod mosaic;
pub mod output;
pub mod pipeline;
pub mod projection;
pub mod sky;
pub mod tile;

/// Version of the hipster library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
