//! Parser for catalog CSV files.
//!
//! The catalog is a comma-separated file with a header row. The columns
//! `id`, `x`, `y` and `z` are required and may appear in any order; other
//! columns are ignored. Every data row must carry a finite, non-zero
//! position vector. Rows are parsed strictly: the first malformed row
//! aborts the load.

use std::io::{BufRead, BufReader, Read};

use super::{CatalogEntry, CatalogError};

const REQUIRED_COLUMNS: [&str; 4] = ["id", "x", "y", "z"];

/// Column positions of the required fields.
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    x: usize,
    y: usize,
    z: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, CatalogError> {
        let names: Vec<String> = header
            .split(',')
            .map(|name| name.trim().trim_matches('"').to_lowercase())
            .collect();

        let find = |wanted: &str| -> Result<usize, CatalogError> {
            names
                .iter()
                .position(|name| name == wanted)
                .ok_or_else(|| CatalogError::MissingColumn(wanted.to_string()))
        };

        Ok(Self {
            id: find(REQUIRED_COLUMNS[0])?,
            x: find(REQUIRED_COLUMNS[1])?,
            y: find(REQUIRED_COLUMNS[2])?,
            z: find(REQUIRED_COLUMNS[3])?,
        })
    }

    fn max_index(&self) -> usize {
        self.id.max(self.x).max(self.y).max(self.z)
    }
}

/// Parser for the `id,x,y,z` catalog format.
pub struct CatalogParser;

impl CatalogParser {
    /// Parse all rows of a catalog.
    ///
    /// Blank lines are skipped. Line numbers in errors are 1-based and count
    /// the header.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut lines = BufReader::new(reader).lines();
        let mut line_number = 0usize;

        let columns = loop {
            match lines.next() {
                Some(line) => {
                    line_number += 1;
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    break Columns::from_header(line.trim_start_matches('\u{feff}'))?;
                }
                None => return Err(CatalogError::MissingHeader),
            }
        };

        let mut entries = Vec::new();
        for line in lines {
            line_number += 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(parse_row(&line, line_number, &columns)?);
        }

        Ok(entries)
    }
}

fn parse_row(line: &str, line_number: usize, columns: &Columns) -> Result<CatalogEntry, CatalogError> {
    let fields: Vec<&str> = line.split(',').map(|f| f.trim().trim_matches('"')).collect();
    if fields.len() <= columns.max_index() {
        return Err(CatalogError::InvalidRow {
            line: line_number,
            reason: format!(
                "expected at least {} fields, found {}",
                columns.max_index() + 1,
                fields.len()
            ),
        });
    }

    let id = fields[columns.id];
    if id.is_empty() {
        return Err(CatalogError::InvalidRow {
            line: line_number,
            reason: "empty id".to_string(),
        });
    }

    let coordinate = |index: usize, name: &str| -> Result<f64, CatalogError> {
        let raw = fields[index];
        let value: f64 = raw.parse().map_err(|_| CatalogError::InvalidRow {
            line: line_number,
            reason: format!("{} is not a number: '{}'", name, raw),
        })?;
        if !value.is_finite() {
            return Err(CatalogError::InvalidRow {
                line: line_number,
                reason: format!("{} is not finite: '{}'", name, raw),
            });
        }
        Ok(value)
    };

    let position = [
        coordinate(columns.x, "x")?,
        coordinate(columns.y, "y")?,
        coordinate(columns.z, "z")?,
    ];

    if position.iter().all(|c| *c == 0.0) {
        return Err(CatalogError::InvalidRow {
            line: line_number,
            reason: "position is the zero vector".to_string(),
        });
    }

    Ok(CatalogEntry::new(id, position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let data = "id,x,y,z\n1,1.0,0.0,0.0\n2,0,1,0\n";
        let entries = CatalogParser::parse(data.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "1");
        assert_eq!(entries[0].position, [1.0, 0.0, 0.0]);
        assert_eq!(entries[1].id, "2");
        assert_eq!(entries[1].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_parse_reordered_and_extra_columns() {
        let data = "z,label,id,y,x\n0.5,foo,17,0.5,0.7071\n";
        let entries = CatalogParser::parse(data.as_bytes()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "17");
        assert_eq!(entries[0].position, [0.7071, 0.5, 0.5]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let data = "\nid,x,y,z\n\n3,0,0,1\n\n";
        let entries = CatalogParser::parse(data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "3");
    }

    #[test]
    fn test_parse_quoted_header() {
        let data = "\"id\",\"x\",\"y\",\"z\"\n\"a\",0,0,-1\n";
        let entries = CatalogParser::parse(data.as_bytes()).unwrap();
        assert_eq!(entries[0].id, "a");
    }

    #[test]
    fn test_missing_header() {
        let result = CatalogParser::parse("".as_bytes());
        assert!(matches!(result, Err(CatalogError::MissingHeader)));
    }

    #[test]
    fn test_missing_column() {
        let result = CatalogParser::parse("id,x,y\n1,0,0\n".as_bytes());
        match result {
            Err(CatalogError::MissingColumn(name)) => assert_eq!(name, "z"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_coordinate_is_fatal() {
        let data = "id,x,y,z\n1,1,0,0\n2,abc,0,0\n3,0,0,1\n";
        match CatalogParser::parse(data.as_bytes()) {
            Err(CatalogError::InvalidRow { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_short_row_is_fatal() {
        let data = "id,x,y,z\n1,1,0\n";
        assert!(matches!(
            CatalogParser::parse(data.as_bytes()),
            Err(CatalogError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_coordinate_is_fatal() {
        let data = "id,x,y,z\n1,NaN,0,0\n";
        assert!(matches!(
            CatalogParser::parse(data.as_bytes()),
            Err(CatalogError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_zero_vector_is_fatal() {
        let data = "id,x,y,z\n1,0,0,0\n";
        assert!(matches!(
            CatalogParser::parse(data.as_bytes()),
            Err(CatalogError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_id_is_fatal() {
        let data = "id,x,y,z\n,1,0,0\n";
        assert!(matches!(
            CatalogParser::parse(data.as_bytes()),
            Err(CatalogError::InvalidRow { line: 2, .. })
        ));
    }
}
