//! Pattern fixtures and grid builders.

use std::collections::BTreeSet;

use lifegrid_core::{is_alive, Dims, ALIVE, DEAD};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A live-cell pattern as `(x, y)` offsets.
pub type Pattern = [(usize, usize)];

/// South-east travelling glider. Period 4, moves (+1, +1) per cycle.
///
/// ```text
/// . X .
/// . . X
/// X X X
/// ```
pub const GLIDER: [(usize, usize); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

/// Horizontal blinker. Period 2.
pub const BLINKER: [(usize, usize); 3] = [(0, 0), (1, 0), (2, 0)];

/// 2x2 block. Still life.
pub const BLOCK: [(usize, usize); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// All-dead state for `dims` with `pattern` placed at `origin`.
///
/// Cells falling outside the grid are dropped.
pub fn grid_with(dims: Dims, pattern: &Pattern, origin: (usize, usize)) -> Vec<u8> {
    let mut state = vec![DEAD; dims.cell_count()];
    for &(x, y) in pattern {
        if let Some(i) = dims.index(origin.0 + x, origin.1 + y) {
            state[i] = ALIVE;
        }
    }
    state
}

/// Coordinates of every live cell.
pub fn live_set(state: &[u8], dims: Dims) -> BTreeSet<(usize, usize)> {
    state
        .iter()
        .enumerate()
        .filter(|(_, &v)| is_alive(v))
        .filter_map(|(i, _)| dims.coords(i))
        .collect()
}

/// `pattern` placed at `origin`, as a set, with coordinates wrapped
/// modulo `dims`.
pub fn placed_wrapped(pattern: &Pattern, origin: (usize, usize), dims: Dims) -> BTreeSet<(usize, usize)> {
    pattern
        .iter()
        .map(|&(x, y)| ((origin.0 + x) % dims.cols, (origin.1 + y) % dims.rows))
        .collect()
}

/// Reproducible Bernoulli(`density`) state.
pub fn random_state(dims: Dims, density: f64, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..dims.cell_count())
        .map(|_| if rng.random_bool(density) { ALIVE } else { DEAD })
        .collect()
}
