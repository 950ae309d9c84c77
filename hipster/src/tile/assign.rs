//! Assignment of catalog entries to sky cells.

use std::collections::BTreeMap;

use super::TileError;
use crate::catalog::Catalog;
use crate::sky::SkyIndex;

/// Catalog indices per cell id, ordered by cell id.
pub type Assignment = BTreeMap<u64, Vec<usize>>;

/// The four nested children of a cell, in order.
#[inline]
pub fn children(cell: u64) -> [u64; 4] {
    let first = cell * 4;
    [first, first + 1, first + 2, first + 3]
}

/// Partitions catalog entries into the cells their positions fall in.
#[derive(Clone, Copy)]
pub struct CellAssigner<'a> {
    sky: &'a dyn SkyIndex,
    catalog: &'a Catalog,
}

impl<'a> CellAssigner<'a> {
    pub fn new(sky: &'a dyn SkyIndex, catalog: &'a Catalog) -> Self {
        Self { sky, catalog }
    }

    /// Assign `candidates` to the requested `cells` at `order`.
    ///
    /// Every requested cell is a key of the result, possibly with an empty
    /// list. Entries landing outside the requested cells are dropped. Each
    /// list keeps the input order of `candidates`.
    pub fn assign(
        &self,
        order: u8,
        candidates: &[usize],
        cells: &[u64],
    ) -> Result<Assignment, TileError> {
        let mut assignment: Assignment = cells.iter().map(|&cell| (cell, Vec::new())).collect();

        for &index in candidates {
            let cell = self.cell_of(order, index)?;
            if let Some(list) = assignment.get_mut(&cell) {
                list.push(index);
            }
        }

        Ok(assignment)
    }

    /// Assign `candidates` across the whole order.
    ///
    /// Only occupied cells appear in the result.
    pub fn assign_all(&self, order: u8, candidates: &[usize]) -> Result<Assignment, TileError> {
        let mut assignment = Assignment::new();
        for &index in candidates {
            let cell = self.cell_of(order, index)?;
            assignment.entry(cell).or_default().push(index);
        }
        Ok(assignment)
    }

    fn cell_of(&self, order: u8, index: usize) -> Result<u64, TileError> {
        let entry = self.catalog.get(index).ok_or(TileError::UnknownEntry {
            index,
            len: self.catalog.len(),
        })?;
        Ok(self.sky.vector_to_cell(order, &entry.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::sky::NestedHealpix;

    fn sample_catalog() -> Catalog {
        let hp = NestedHealpix;
        // At order 1 everything but "b" lands in cell 4. Points sit at
        // order-2 centers; a parent center is a vertex shared by its children.
        vec![
            CatalogEntry::new("a", hp.cell_to_vector(2, 19)),
            CatalogEntry::new("b", hp.cell_to_vector(1, 0)),
            CatalogEntry::new("c", hp.cell_to_vector(2, 17)),
            CatalogEntry::new("d", hp.cell_to_vector(2, 18)),
            CatalogEntry::new("e", hp.cell_to_vector(2, 19)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_children() {
        assert_eq!(children(0), [0, 1, 2, 3]);
        assert_eq!(children(7), [28, 29, 30, 31]);
    }

    #[test]
    fn test_assign_keeps_requested_cells_and_input_order() {
        let catalog = sample_catalog();
        let hp = NestedHealpix;
        let assigner = CellAssigner::new(&hp, &catalog);

        let result = assigner
            .assign(1, &[4, 1, 0, 2], &children(1))
            .unwrap();

        assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
        assert_eq!(result[&4], vec![4, 0, 2]);
        assert_eq!(result[&5], Vec::<usize>::new());
        assert!(result[&6].is_empty());
        assert!(result[&7].is_empty());
    }

    #[test]
    fn test_assign_is_a_partition() {
        let catalog = sample_catalog();
        let hp = NestedHealpix;
        let assigner = CellAssigner::new(&hp, &catalog);
        let candidates = catalog.indices();

        let cells: Vec<u64> = (0..48).collect();
        let result = assigner.assign(1, &candidates, &cells).unwrap();

        let mut seen: Vec<usize> = result.values().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, candidates);
    }

    #[test]
    fn test_assign_drops_outside_entries() {
        let catalog = sample_catalog();
        let hp = NestedHealpix;
        let assigner = CellAssigner::new(&hp, &catalog);

        let result = assigner.assign(2, &catalog.indices(), &[17]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[&17], vec![2]);

        let result = assigner.assign(2, &catalog.indices(), &children(4)).unwrap();
        assert_eq!(result[&16], Vec::<usize>::new());
        assert_eq!(result[&17], vec![2]);
        assert_eq!(result[&18], vec![3]);
        assert_eq!(result[&19], vec![0, 4]);
    }

    #[test]
    fn test_assign_all_only_occupied() {
        let catalog = sample_catalog();
        let hp = NestedHealpix;
        let assigner = CellAssigner::new(&hp, &catalog);

        let result = assigner.assign_all(0, &catalog.indices()).unwrap();
        // cells 17 and 18 at order 2 both sit in face 1
        assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(result[&0], vec![1]);
        assert_eq!(result[&1], vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_entry() {
        let catalog = sample_catalog();
        let hp = NestedHealpix;
        let assigner = CellAssigner::new(&hp, &catalog);

        assert!(matches!(
            assigner.assign(0, &[99], &[0]),
            Err(TileError::UnknownEntry { index: 99, len: 5 })
        ));
    }
}
