//! Dataset catalog.
//!
//! A catalog is the read-only list of dataset entries, each pairing an image
//! id with its position on the unit sphere. The tile builder refers to
//! entries by their index into the catalog.

mod parser;

pub use parser::CatalogParser;

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::sky::Vec3;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to open catalog {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog has no header row")]
    MissingHeader,

    #[error("Catalog is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid catalog row at line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

/// One dataset entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Identifier used to locate the entry's image
    pub id: String,
    /// Position on the unit sphere
    pub position: Vec3,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// Immutable, indexable collection of catalog entries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog CSV from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = CatalogParser::parse(file)?;

        info!(
            path = %path.display(),
            entries = entries.len(),
            "Loaded catalog"
        );

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Indices of every entry, in catalog order.
    pub fn indices(&self) -> Vec<usize> {
        (0..self.entries.len()).collect()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "id,x,y,z").unwrap();
        writeln!(file, "10,1,0,0").unwrap();
        writeln!(file, "11,0,0,1").unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().id, "11");
        assert_eq!(catalog.indices(), vec![0, 1]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::load(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(CatalogError::Open { .. })));
    }

    #[test]
    fn test_from_iterator() {
        let catalog: Catalog = vec![
            CatalogEntry::new("a", [1.0, 0.0, 0.0]),
            CatalogEntry::new("b", [0.0, 1.0, 0.0]),
        ]
        .into_iter()
        .collect();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.entries()[0].id, "a");
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::InvalidRow {
            line: 4,
            reason: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid catalog row at line 4: bad");
    }
}
