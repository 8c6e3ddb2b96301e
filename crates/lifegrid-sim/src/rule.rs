//! Conway's B3/S23 rule on a bounded grid.
//!
//! Edges are hard boundaries: neighbors outside the grid count as dead.
//! [`step`] is the sequential reference used to validate the parallel
//! backends.

use crate::grid::{ALIVE, DEAD, Generation, GridDims};

/// Offsets of the eight Moore neighbors.
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Next state of one cell given its live neighbor count.
#[inline]
pub fn next_state(alive: bool, live_neighbors: u32) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Live neighbors of `(row, col)` in a raw row-major cell slice.
#[inline]
pub fn live_neighbors(cells: &[u32], dims: GridDims, row: u32, col: u32) -> u32 {
    NEIGHBORS
        .iter()
        .filter_map(|&(dr, dc)| dims.index(row as i64 + dr, col as i64 + dc))
        .filter(|&i| cells[i] != DEAD)
        .count() as u32
}

/// New value for `(row, col)` read from `current`.
#[inline]
pub fn next_cell(current: &[u32], dims: GridDims, row: u32, col: u32) -> u32 {
    let i = row as usize * dims.cols() as usize + col as usize;
    let alive = current[i] != DEAD;
    if next_state(alive, live_neighbors(current, dims, row, col)) {
        ALIVE
    } else {
        DEAD
    }
}

/// Computes the next generation sequentially.
pub fn step(current: &Generation) -> Generation {
    let dims = current.dims();
    let cells = (0..dims.rows())
        .flat_map(|r| (0..dims.cols()).map(move |c| (r, c)))
        .map(|(r, c)| next_cell(current.cells(), dims, r, c))
        .collect();
    // Shape is unchanged, so the length always matches.
    Generation::from_cells(dims, cells).unwrap_or_else(|_| Generation::dead(dims))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(rows: &[&str]) -> Generation {
        Generation::from_rows(rows).unwrap()
    }

    #[test]
    fn rule_table() {
        for n in 0..=8 {
            assert_eq!(next_state(true, n), n == 2 || n == 3, "live with {n}");
            assert_eq!(next_state(false, n), n == 3, "dead with {n}");
        }
    }

    #[test]
    fn corner_has_three_neighbors_at_most() {
        let g = pattern(&["###", "###", "###"]);
        assert_eq!(live_neighbors(g.cells(), g.dims(), 0, 0), 3);
        assert_eq!(live_neighbors(g.cells(), g.dims(), 0, 1), 5);
        assert_eq!(live_neighbors(g.cells(), g.dims(), 1, 1), 8);
    }

    #[test]
    fn self_is_not_a_neighbor() {
        let g = pattern(&["...", ".#.", "..."]);
        assert_eq!(live_neighbors(g.cells(), g.dims(), 1, 1), 0);
    }

    #[test]
    fn single_cell_dies() {
        let next = step(&pattern(&["...", ".#.", "..."]));
        assert!(next.is_extinct());
    }

    #[test]
    fn block_is_still() {
        let block = pattern(&["....", ".##.", ".##.", "...."]);
        assert_eq!(step(&block), block);
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = pattern(&[".....", ".....", ".###.", ".....", "....."]);
        let vertical = pattern(&[".....", "..#..", "..#..", "..#..", "....."]);
        assert_eq!(step(&horizontal), vertical);
        assert_eq!(step(&vertical), horizontal);
    }

    #[test]
    fn edges_do_not_wrap() {
        // On a torus the left and right columns would feed each other.
        let g = pattern(&["#...#", "#...#", "#...#"]);
        let next = step(&g);
        assert_eq!(next.to_rows(), vec![".....", "##.##", "....."]);
    }

    #[test]
    fn blinker_on_edge_is_clipped() {
        // Vertical blinker in the left column: its horizontal phase would need
        // col -1, so only two cells survive the boundary.
        let g = pattern(&["#..", "#..", "#.."]);
        assert_eq!(step(&g).to_rows(), vec!["...", "##.", "..."]);
    }
}
