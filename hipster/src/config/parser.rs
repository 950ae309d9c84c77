//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::{clamp_threads, ORDER_LIMIT};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [pyramid] section
    if let Some(section) = ini.section(Some("pyramid")) {
        if let Some(v) = section.get("max_order") {
            let value: u8 = parse_value(
                "pyramid",
                "max_order",
                v,
                "must be an integer between 0 and 9",
            )?;
            if value >= ORDER_LIMIT {
                return Err(invalid(
                    "pyramid",
                    "max_order",
                    v,
                    "must be an integer between 0 and 9",
                ));
            }
            config.pyramid.max_order = value;
        }
        if let Some(v) = section.get("hierarchy_depth") {
            config.pyramid.hierarchy_depth =
                parse_positive("pyramid", "hierarchy_depth", v)?;
        }
        if let Some(v) = section.get("crop_size") {
            config.pyramid.crop_size = parse_positive("pyramid", "crop_size", v)?;
        }
        if let Some(v) = section.get("output_size") {
            let value: u32 = parse_positive("pyramid", "output_size", v)?;
            if !value.is_power_of_two() {
                return Err(invalid(
                    "pyramid",
                    "output_size",
                    v,
                    "must be a power of two (e.g. 256, 512)",
                ));
            }
            config.pyramid.output_size = value;
        }
        if let Some(v) = section.get("distortion_correction") {
            config.pyramid.distortion_correction = parse_bool(v);
        }
        if let Some(v) = section.get("root_candidates") {
            config.pyramid.root_candidates = v
                .parse()
                .map_err(|_| invalid("pyramid", "root_candidates", v, "must be 'all' or 'cell'"))?;
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = non_empty(section, "directory") {
            config.output.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "title") {
            if v.contains(|c: char| c == '/' || c == '\\') {
                return Err(invalid(
                    "output",
                    "title",
                    v,
                    "must not contain path separators",
                ));
            }
            config.output.title = v.to_string();
        }
        if let Some(v) = section.get("tile_format") {
            config.output.tile_format = v
                .parse()
                .map_err(|_| invalid("output", "tile_format", v, "must be 'jpeg' or 'png'"))?;
        }
        if let Some(v) = section.get("mosaic_edge") {
            config.output.mosaic_edge = parse_positive("output", "mosaic_edge", v)?;
        }
        if let Some(v) = non_empty(section, "hipster_url") {
            config.output.hipster_url = v.to_string();
        }
    }

    // [input] section
    if let Some(section) = ini.section(Some("input")) {
        if let Some(v) = non_empty(section, "catalog") {
            config.input.catalog = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section, "images") {
            config.input.images = Some(expand_tilde(v));
        }
    }

    // [generation] section
    if let Some(section) = ini.section(Some("generation")) {
        if let Some(v) = section.get("threads") {
            let threads: usize = parse_value("generation", "threads", v, "must be a positive integer")?;
            config.generation.threads = clamp_threads(threads);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(section: &str, key: &str, value: &str) -> Result<u32, ConfigFileError> {
    let parsed: u32 = parse_value(section, key, value, "must be a positive integer")?;
    if parsed == 0 {
        return Err(invalid(section, key, value, "must be a positive integer"));
    }
    Ok(parsed)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a boolean value from the INI.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RootCandidates;
    use crate::output::TileFormat;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[pyramid]
max_order = 5
hierarchy_depth = 3
crop_size = 128
output_size = 256
distortion_correction = yes
root_candidates = cell

[output]
directory = /srv/hips
title = galaxies
tile_format = png
mosaic_edge = 32
hipster_url = https://example.org

[input]
catalog = /data/catalog.csv
images = /data/images

[generation]
threads = 6

[logging]
file = /tmp/hipster.log
"#,
        )
        .unwrap();

        assert_eq!(config.pyramid.max_order, 5);
        assert_eq!(config.pyramid.hierarchy_depth, 3);
        assert_eq!(config.pyramid.crop_size, 128);
        assert_eq!(config.pyramid.output_size, 256);
        assert!(config.pyramid.distortion_correction);
        assert_eq!(config.pyramid.root_candidates, RootCandidates::Cell);
        assert_eq!(config.output.directory, PathBuf::from("/srv/hips"));
        assert_eq!(config.output.title, "galaxies");
        assert_eq!(config.output.tile_format, TileFormat::Png);
        assert_eq!(config.output.mosaic_edge, 32);
        assert_eq!(config.output.hipster_url, "https://example.org");
        assert_eq!(config.input.catalog, Some(PathBuf::from("/data/catalog.csv")));
        assert_eq!(config.input.images, Some(PathBuf::from("/data/images")));
        assert_eq!(config.generation.threads, 6);
        assert_eq!(config.logging.file, PathBuf::from("/tmp/hipster.log"));
    }

    #[test]
    fn test_partial_config() {
        let config = load("[pyramid]\nmax_order = 1\n").unwrap();
        let default = ConfigFile::default();

        assert_eq!(config.pyramid.max_order, 1);
        assert_eq!(config.pyramid.crop_size, default.pyramid.crop_size);
        assert_eq!(config.output, default.output);
    }

    #[test]
    fn test_invalid_max_order() {
        let err = load("[pyramid]\nmax_order = 10\n").unwrap_err();
        assert!(err.to_string().contains("pyramid.max_order"));
        assert!(err.to_string().contains("between 0 and 9"));
    }

    #[test]
    fn test_invalid_output_size() {
        let err = load("[pyramid]\noutput_size = 300\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "output_size");
                assert_eq!(value, "300");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = load("[pyramid]\nhierarchy_depth = 0\n").unwrap_err();
        assert!(err.to_string().contains("hierarchy_depth"));
    }

    #[test]
    fn test_invalid_tile_format() {
        let err = load("[output]\ntile_format = gif\n").unwrap_err();
        assert!(err.to_string().contains("tile_format"));
    }

    #[test]
    fn test_title_with_separator_rejected() {
        let err = load("[output]\ntitle = a/b\n").unwrap_err();
        assert!(err.to_string().contains("path separators"));
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config = load("[input]\ncatalog =\n\n[logging]\nfile = \n").unwrap();
        assert_eq!(config.input.catalog, None);
        assert_eq!(config.logging.file, ConfigFile::default().logging.file);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" ON "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("nope"));
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
