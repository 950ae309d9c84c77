//! HiPS `properties` metadata and the Aladin Lite preview page.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use super::{LayoutError, TileFormat};

const DEFAULT_CREATOR_DID: &str = "ivo://HITS/hipster";
const HIPS_VERSION: &str = "1.4";
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Contents of the HiPS `properties` file.
#[derive(Debug, Clone)]
pub struct HipsProperties {
    pub title: String,
    pub description: String,
    pub creator_did: String,
    pub progenitor: String,
    pub max_order: u8,
    pub tile_width: u32,
    pub tile_format: TileFormat,
    pub created: DateTime<Utc>,
}

impl HipsProperties {
    pub fn new(title: impl Into<String>, max_order: u8, tile_width: u32) -> Self {
        let title = title.into();
        Self {
            description: format!("Dataset projection of {}", title),
            title,
            creator_did: DEFAULT_CREATOR_DID.to_string(),
            progenitor: "hipster".to_string(),
            max_order,
            tile_width,
            tile_format: TileFormat::default(),
            created: Utc::now(),
        }
    }

    pub fn with_tile_format(mut self, format: TileFormat) -> Self {
        self.tile_format = format;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// Render as `key = value` lines.
    pub fn render(&self) -> String {
        let date = self.created.format(DATE_FORMAT).to_string();
        let fields: [(&str, String); 15] = [
            ("creator_did", self.creator_did.clone()),
            ("obs_title", self.title.clone()),
            ("obs_description", self.description.clone()),
            ("dataproduct_type", "image".to_string()),
            ("dataproduct_subtype", "color".to_string()),
            ("hips_version", HIPS_VERSION.to_string()),
            ("prov_progenitor", self.progenitor.clone()),
            ("hips_creation_date", date.clone()),
            ("hips_release_date", date),
            ("hips_status", "public master clonable".to_string()),
            ("hips_tile_format", self.tile_format.hips_name().to_string()),
            ("hips_order", self.max_order.to_string()),
            ("hips_order_min", "0".to_string()),
            ("hips_tile_width", self.tile_width.to_string()),
            ("hips_frame", "equatorial".to_string()),
        ];

        fields
            .iter()
            .map(|(key, value)| format!("{:<21}= {}\n", key, value))
            .collect()
    }

    /// Write the `properties` file into `dir`.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, LayoutError> {
        let path = dir.join("properties");
        write_file(&path, &self.render())?;
        info!(path = %path.display(), "Wrote HiPS properties");
        Ok(path)
    }
}

/// Aladin Lite `index.html` pointing at a published tile tree.
#[derive(Debug, Clone)]
pub struct IndexPage {
    pub title: String,
    /// Base URL the tile tree is served from
    pub hipster_url: String,
    pub max_order: u8,
    pub tile_format: TileFormat,
}

impl IndexPage {
    pub fn new(title: impl Into<String>, hipster_url: impl Into<String>, max_order: u8) -> Self {
        Self {
            title: title.into(),
            hipster_url: hipster_url.into(),
            max_order,
            tile_format: TileFormat::default(),
        }
    }

    pub fn with_tile_format(mut self, format: TileFormat) -> Self {
        self.tile_format = format;
        self
    }

    /// URL of the tile tree.
    pub fn survey_url(&self) -> String {
        format!(
            "{}/web/{}/{}",
            self.hipster_url.trim_end_matches('/'),
            self.title,
            super::PROJECTION_DIR
        )
    }

    pub fn render(&self) -> String {
        let base = self.hipster_url.trim_end_matches('/');
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta name='description' content='custom HiPS of {title}'>
  <meta charset='utf-8'>
  <meta name='viewport' content='width=device-width, height=device-height, initial-scale=1.0, user-scalable=no'>
  <title>HiPSter representation of {title}</title>
</head>
<body>
    <div id='aladin-lite-div' style='width:500px;height:500px;'></div>
    <script type='text/javascript' src='{base}/aladin-lite/dist/aladin.umd.cjs' charset='utf-8'></script>
    <script type='text/javascript'>
        var aladin;
        A.init.then(() => {{
            aladin = A.aladin('#aladin-lite-div', {{fullScreen: true}});
            aladin.setImageSurvey(aladin.createImageSurvey('{title}', 'sphere projection of data from {title}', '{url}', 'equatorial', {max_order}, {{imgFormat: '{format}'}}));
            aladin.setFoV(180.0);
        }});
    </script>
</body>
</html>
"#,
            title = self.title,
            base = base,
            url = self.survey_url(),
            max_order = self.max_order,
            format = self.tile_format.extension(),
        )
    }

    /// Write `index.html` into `dir`.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, LayoutError> {
        let path = dir.join("index.html");
        write_file(&path, &self.render())?;
        info!(path = %path.display(), "Wrote preview page");
        Ok(path)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), LayoutError> {
    fs::write(path, content).map_err(|source| LayoutError::Write {
        path: path.to_path_buf(),
        source,
    })
}
