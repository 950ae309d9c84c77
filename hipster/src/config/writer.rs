//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let catalog = config
        .input
        .catalog
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let images = config
        .input
        .images
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let distortion_correction = if config.pyramid.distortion_correction {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[pyramid]
; Deepest HiPS order to generate, 0-9 (default: 3)
max_order = {}
; Number of tile levels combined into one tile (default: 1)
; Each internal level doubles the tile side: 1 → 1x, 2 → 2x, 3 or 4 → 4x
hierarchy_depth = {}
; Side of the center crop taken from each dataset image (default: 64)
crop_size = {}
; Side of a leaf tile in pixels, power of two (default: 512)
output_size = {}
; Reproject images onto the cell's angular footprint (default: false)
distortion_correction = {}
; Entries considered for each root cell (default: all)
;   all  - every catalog entry
;   cell - only entries inside the root cell
root_candidates = {}

[output]
; Parent directory of the <title>/projection tree
directory = {}
; Survey title, used as directory name and in the HiPS metadata
title = {}
; Tile encoding: jpeg or png (default: jpeg)
tile_format = {}
; Thumbnail edge in the Allsky mosaic (default: 64)
mosaic_edge = {}
; URL the survey is served from, used by index.html
hipster_url = {}

[input]
; Catalog CSV with id,x,y,z columns
catalog = {}
; Directory holding <id>.png images
images = {}

[generation]
; Number of threads for parallel tile generation (default: number of CPU cores)
threads = {}

[logging]
; Log file path (default: ~/.hipster/hipster.log)
file = {}
"#,
        config.pyramid.max_order,
        config.pyramid.hierarchy_depth,
        config.pyramid.crop_size,
        config.pyramid.output_size,
        distortion_correction,
        config.pyramid.root_candidates,
        path_to_string(&config.output.directory),
        config.output.title,
        config.output.tile_format,
        config.output.mosaic_edge,
        config.output.hipster_url,
        catalog,
        images,
        config.generation.threads,
        path_to_string(&config.logging.file),
    )
}

/// Render a path, abbreviating the home directory as `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
