//! Grid dimensions and host-side generation snapshots.

use crate::error::{Result, SimError};

/// Cell value of a live cell.
pub const ALIVE: u32 = 1;
/// Cell value of a dead cell.
pub const DEAD: u32 = 0;

/// Grid shape, fixed for one simulation run. Row-major.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GridDims {
    rows: u32,
    cols: u32,
}

impl GridDims {
    /// Validates `rows × cols`; both must be non-zero and the cell count must
    /// fit in `u32` (the shaders index with `u32`).
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        let invalid = SimError::InvalidDimensions { rows, cols };
        if rows == 0 || cols == 0 {
            return Err(invalid);
        }
        rows.checked_mul(cols).ok_or(invalid)?;
        Ok(Self { rows, cols })
    }

    #[inline]
    pub fn rows(self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cols(self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn cell_count(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Size in bytes of one generation buffer.
    #[inline]
    pub fn byte_size(self) -> u64 {
        self.cell_count() as u64 * std::mem::size_of::<u32>() as u64
    }

    /// Linear index of `(row, col)`, or `None` when out of range.
    #[inline]
    pub fn index(self, row: i64, col: i64) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }
}

/// Host-side copy of one generation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Generation {
    dims: GridDims,
    cells: Vec<u32>,
}

impl Generation {
    /// All-dead generation.
    pub fn dead(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![DEAD; dims.cell_count()],
        }
    }

    /// Wraps raw cells; `cells.len()` must equal the cell count.
    pub fn from_cells(dims: GridDims, cells: Vec<u32>) -> Result<Self> {
        if cells.len() != dims.cell_count() {
            return Err(SimError::InvalidDimensions {
                rows: dims.rows(),
                cols: dims.cols(),
            });
        }
        Ok(Self { dims, cells })
    }

    /// Parses a pattern, one string per row: `#`/`O`/`1` live, anything else
    /// dead. Rows shorter than the widest are padded dead.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let dims = GridDims::new(rows.len() as u32, cols as u32)?;
        let mut g = Self::dead(dims);
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                g.set(r as u32, c as u32, matches!(ch, '#' | 'O' | '1'));
            }
        }
        Ok(g)
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<u32> {
        self.cells
    }

    /// Returns whether `(row, col)` is live; out-of-range cells read as dead.
    #[inline]
    pub fn is_alive(&self, row: i64, col: i64) -> bool {
        self.dims
            .index(row, col)
            .is_some_and(|i| self.cells[i] != DEAD)
    }

    /// Sets `(row, col)`. Panics when out of range.
    pub fn set(&mut self, row: u32, col: u32, alive: bool) {
        let i = self
            .dims
            .index(row as i64, col as i64)
            .unwrap_or_else(|| panic!("cell ({row}, {col}) outside {:?}", self.dims));
        self.cells[i] = if alive { ALIVE } else { DEAD };
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != DEAD).count()
    }

    pub fn is_extinct(&self) -> bool {
        self.live_count() == 0
    }

    /// Renders the generation with `#` for live and `.` for dead cells.
    pub fn to_rows(&self) -> Vec<String> {
        let glyph = |&c: &u32| if c != DEAD { '#' } else { '.' };
        self.cells
            .chunks(self.dims.cols() as usize)
            .map(|row| row.iter().map(glyph).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_reject_zero() {
        assert_eq!(
            GridDims::new(0, 4),
            Err(SimError::InvalidDimensions { rows: 0, cols: 4 })
        );
        assert!(GridDims::new(4, 0).is_err());
    }

    #[test]
    fn dims_reject_overflowing_cell_count() {
        assert!(GridDims::new(u32::MAX, 2).is_err());
    }

    #[test]
    fn index_is_row_major_and_bounded() {
        let d = GridDims::new(3, 4).unwrap();
        assert_eq!(d.index(0, 0), Some(0));
        assert_eq!(d.index(1, 2), Some(6));
        assert_eq!(d.index(2, 3), Some(11));
        assert_eq!(d.index(3, 0), None);
        assert_eq!(d.index(0, -1), None);
        assert_eq!(d.byte_size(), 48);
    }

    #[test]
    fn pattern_round_trips_through_rows() {
        let g = Generation::from_rows(&[".#.", "##", "..#"]).unwrap();
        assert_eq!(g.dims(), GridDims::new(3, 3).unwrap());
        assert_eq!(g.to_rows(), vec![".#.", "##.", "..#"]);
        assert_eq!(g.live_count(), 4);
    }

    #[test]
    fn from_cells_checks_length() {
        let d = GridDims::new(2, 2).unwrap();
        assert!(Generation::from_cells(d, vec![0; 3]).is_err());
        assert!(Generation::from_cells(d, vec![0; 4]).is_ok());
    }

    #[test]
    fn out_of_range_reads_dead() {
        let g = Generation::from_rows(&["#"]).unwrap();
        assert!(g.is_alive(0, 0));
        assert!(!g.is_alive(-1, 0));
        assert!(!g.is_alive(0, 1));
    }
}
