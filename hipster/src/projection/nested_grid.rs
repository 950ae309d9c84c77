//! Fine-cell index grid covering one tile.
//!
//! A tile of side `N` (a power of two) over cell `k` is covered by the
//! `N²` cells `log2(N)` orders below `k`. Quartering the grid recursively
//! places the nested children like this:
//!
//! ```text
//!   ┌────────┬────────┐
//!   │ 4k     │ 4k+2   │
//!   ├────────┼────────┤
//!   │ 4k+1   │ 4k+3   │
//!   └────────┴────────┘
//! ```

/// Row-major grid of fine cell ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedGrid {
    size: u32,
    cells: Vec<u64>,
}

impl NestedGrid {
    /// Build the grid for `cell` with side `size`.
    ///
    /// `size` must be a power of two (callers validate this).
    pub fn build(size: u32, cell: u64) -> Self {
        let mut cells = vec![0u64; size as usize * size as usize];
        fill(&mut cells, size as usize, 0, 0, size as usize, cell);
        Self { size, cells }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Fine cell id at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u64 {
        self.cells[y as usize * self.size as usize + x as usize]
    }

    /// One row of the grid.
    pub fn row(&self, y: u32) -> &[u64] {
        let start = y as usize * self.size as usize;
        &self.cells[start..start + self.size as usize]
    }
}

fn fill(cells: &mut [u64], stride: usize, x0: usize, y0: usize, size: usize, cell: u64) {
    if size <= 1 {
        cells[y0 * stride + x0] = cell;
        return;
    }
    let half = size / 2;
    fill(cells, stride, x0, y0, half, cell * 4);
    fill(cells, stride, x0, y0 + half, half, cell * 4 + 1);
    fill(cells, stride, x0 + half, y0, half, cell * 4 + 2);
    fill(cells, stride, x0 + half, y0 + half, half, cell * 4 + 3);
}
