//! 8-connected (Moore) neighbourhood lookup on a row-major grid.
//!
//! These helpers resolve neighbours one cell at a time and are meant for
//! rules that inspect a neighbourhood occasionally. The stepper's hot loop
//! does its own row-slice arithmetic.

use lifegrid_core::{is_alive, Dims, Topology};
use smallvec::SmallVec;

/// All 8 offsets as `(dx, dy)`: W, E, N, S, NW, NE, SW, SE.
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Flat indices of the Moore neighbours of `(x, y)`.
///
/// Under [`Topology::Bounded`] off-grid neighbours are omitted (corners
/// have 3, edges 5). Under [`Topology::Toroidal`] every cell has exactly
/// 8 entries; on grids narrower than 3 cells some entries repeat, which
/// is the periodic neighbourhood taken literally.
pub fn moore_neighbours(dims: Dims, topology: Topology, x: usize, y: usize) -> SmallVec<[usize; 8]> {
    let mut result = SmallVec::new();
    if !dims.contains(x, y) {
        return result;
    }
    for (dx, dy) in MOORE_OFFSETS {
        let nx = topology.resolve_axis(x as i64 + dx, dims.cols);
        let ny = topology.resolve_axis(y as i64 + dy, dims.rows);
        if let (Some(nx), Some(ny)) = (nx, ny) {
            result.push(ny * dims.cols + nx);
        }
    }
    result
}

/// Count live Moore neighbours of `(x, y)` in `state`.
pub fn live_neighbours(state: &[u8], dims: Dims, topology: Topology, x: usize, y: usize) -> u8 {
    moore_neighbours(dims, topology, x, y)
        .into_iter()
        .filter(|&i| is_alive(state[i]))
        .count() as u8
}
