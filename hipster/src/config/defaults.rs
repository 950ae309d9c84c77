//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants, CPU-aware helper functions,
//! and the `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use super::RootCandidates;
use crate::output::TileFormat;

/// Default deepest order.
pub const DEFAULT_MAX_ORDER: u8 = 3;

/// Orders at or above this are rejected.
pub const ORDER_LIMIT: u8 = 10;

/// Default hierarchy depth (one tile level per tile).
pub const DEFAULT_HIERARCHY_DEPTH: u32 = 1;

/// Default center crop side.
pub const DEFAULT_CROP_SIZE: u32 = 64;

/// Default leaf tile side.
pub const DEFAULT_OUTPUT_SIZE: u32 = crate::projection::DEFAULT_OUTPUT_SIZE;

/// Default Allsky thumbnail edge.
pub const DEFAULT_MOSAIC_EDGE: u32 = crate::mosaic::DEFAULT_EDGE;

/// Default survey title.
pub const DEFAULT_TITLE: &str = "hipster";

/// Default preview base URL.
pub const DEFAULT_HIPSTER_URL: &str = "http://localhost:8000";

/// Upper bound on worker threads.
pub const MAX_THREADS: usize = 256;

/// Get the number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Clamps the worker thread count to `1..=MAX_THREADS` and logs a warning if clamped.
pub(super) fn clamp_threads(value: usize) -> usize {
    let clamped = value.clamp(1, MAX_THREADS);
    if clamped != value {
        tracing::warn!(
            requested = value,
            max = MAX_THREADS,
            "threads out of range, clamping to {}",
            clamped
        );
    }
    clamped
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = config_directory();

        Self {
            pyramid: PyramidSettings {
                max_order: DEFAULT_MAX_ORDER,
                hierarchy_depth: DEFAULT_HIERARCHY_DEPTH,
                crop_size: DEFAULT_CROP_SIZE,
                output_size: DEFAULT_OUTPUT_SIZE,
                distortion_correction: false,
                root_candidates: RootCandidates::default(),
            },
            output: OutputSettings {
                directory: PathBuf::from("."),
                title: DEFAULT_TITLE.to_string(),
                tile_format: TileFormat::default(),
                mosaic_edge: DEFAULT_MOSAIC_EDGE,
                hipster_url: DEFAULT_HIPSTER_URL.to_string(),
            },
            input: InputSettings::default(),
            generation: GenerationSettings { threads: num_cpus() },
            logging: LoggingSettings {
                file: config_dir.join("hipster.log"),
            },
        }
    }
}
