//! The generation stepper and its hot loop.

use lifegrid_core::{is_alive, resize_preserving, Dims, LifeRule, Topology};
use thiserror::Error;

use crate::pingpong::PingPong;

/// Errors from loading state into a [`GridStepper`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StepperError {
    /// The supplied buffer does not match the grid's cell count.
    #[error("state has {found} cells, grid needs {expected}")]
    LengthMismatch {
        /// `cols * rows` of the stepper's grid.
        expected: usize,
        /// Length of the rejected buffer.
        found: usize,
    },
}

/// Borrowed result of one [`GridStepper::step`].
#[derive(Debug)]
pub struct StepOutput<'a> {
    /// The newly computed generation.
    pub state: &'a [u8],
    /// Row-major indices whose alive/dead value flipped, in scan order.
    pub changes: &'a [u32],
}

/// Double-buffered stepper for a single grid.
///
/// Holds the current generation in a [`PingPong`] buffer pair and a
/// change-index buffer sized to the grid. `step` writes the next
/// generation into the staging buffer and swaps roles; neither buffer is
/// reallocated unless the grid is resized.
#[derive(Debug, Clone)]
pub struct GridStepper {
    dims: Dims,
    topology: Topology,
    rule: LifeRule,
    buffers: PingPong,
    changes: Vec<u32>,
}

impl GridStepper {
    /// Create a stepper for an all-dead grid.
    pub fn new(dims: Dims, topology: Topology) -> Self {
        let cells = dims.cell_count();
        Self {
            dims,
            topology,
            rule: LifeRule::default(),
            buffers: PingPong::new(cells),
            changes: Vec::with_capacity(cells),
        }
    }

    /// Use `rule` instead of Conway's B3/S23.
    pub fn with_rule(mut self, rule: LifeRule) -> Self {
        self.rule = rule;
        self
    }

    /// Grid dimensions.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Current topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Switch between bounded and toroidal neighbour lookup.
    pub fn set_topology(&mut self, topology: Topology) {
        self.topology = topology;
    }

    /// Current birth/survival rule.
    pub fn rule(&self) -> LifeRule {
        self.rule
    }

    /// Replace the birth/survival rule.
    pub fn set_rule(&mut self, rule: LifeRule) {
        self.rule = rule;
    }

    /// The current generation.
    pub fn state(&self) -> &[u8] {
        self.buffers.published()
    }

    /// Overwrite the current generation with `state`.
    pub fn load(&mut self, state: &[u8]) -> Result<(), StepperError> {
        let expected = self.dims.cell_count();
        if state.len() != expected {
            return Err(StepperError::LengthMismatch {
                expected,
                found: state.len(),
            });
        }
        self.buffers.published_mut().copy_from_slice(state);
        Ok(())
    }

    /// Adopt a new grid size together with its initial state.
    pub fn reinit(&mut self, dims: Dims, state: Vec<u8>) -> Result<(), StepperError> {
        let expected = dims.cell_count();
        if state.len() != expected {
            return Err(StepperError::LengthMismatch {
                expected,
                found: state.len(),
            });
        }
        self.dims = dims;
        self.buffers.replace(state);
        self.changes.clear();
        self.changes.reserve(expected);
        Ok(())
    }

    /// Overwrite one cell of the current generation.
    ///
    /// Returns `false` (and does nothing) if `index` is out of range.
    pub fn set_cell(&mut self, index: usize, value: u8) -> bool {
        match self.buffers.published_mut().get_mut(index) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Resize the grid, preserving the overlapping top-left sub-rectangle.
    ///
    /// Returns the post-resize generation.
    pub fn resize(&mut self, dims: Dims) -> &[u8] {
        let resized = resize_preserving(self.buffers.published(), self.dims, dims);
        self.dims = dims;
        self.buffers.replace(resized);
        self.changes.clear();
        self.changes.shrink_to(dims.cell_count());
        self.changes.reserve(dims.cell_count());
        self.buffers.published()
    }

    /// Compute one generation.
    pub fn step(&mut self) -> StepOutput<'_> {
        let (current, next) = self.buffers.split();
        step_into(
            current,
            next,
            self.dims,
            self.topology,
            &self.rule,
            &mut self.changes,
        );
        self.buffers.publish();
        StepOutput {
            state: self.buffers.published(),
            changes: &self.changes,
        }
    }
}

#[inline]
fn row(state: &[u8], cols: usize, r: usize) -> &[u8] {
    &state[r * cols..(r + 1) * cols]
}

#[inline]
fn alive(v: u8) -> u8 {
    is_alive(v) as u8
}

/// Compute the generation after `current` into `next`.
///
/// `changes` is cleared and refilled with the indices whose alive/dead
/// value differs between `current` and `next`, in row-major order.
///
/// # Panics
///
/// Panics if either buffer's length differs from `dims.cell_count()`.
pub fn step_into(
    current: &[u8],
    next: &mut [u8],
    dims: Dims,
    topology: Topology,
    rule: &LifeRule,
    changes: &mut Vec<u32>,
) {
    let cells = dims.cell_count();
    assert_eq!(current.len(), cells, "current buffer does not match grid");
    assert_eq!(next.len(), cells, "next buffer does not match grid");
    changes.clear();
    if dims.is_empty() {
        return;
    }

    let cols = dims.cols;
    let rows = dims.rows;
    for y in 0..rows {
        let above = topology
            .resolve_axis(y as i64 - 1, rows)
            .map(|r| row(current, cols, r));
        let below = topology
            .resolve_axis(y as i64 + 1, rows)
            .map(|r| row(current, cols, r));
        let here = row(current, cols, y);
        let base = y * cols;

        for x in 0..cols {
            let left = topology.resolve_axis(x as i64 - 1, cols);
            let right = topology.resolve_axis(x as i64 + 1, cols);

            let mut n = 0u8;
            for r in [above, below].into_iter().flatten() {
                n += alive(r[x]);
                if let Some(l) = left {
                    n += alive(r[l]);
                }
                if let Some(rt) = right {
                    n += alive(r[rt]);
                }
            }
            if let Some(l) = left {
                n += alive(here[l]);
            }
            if let Some(rt) = right {
                n += alive(here[rt]);
            }

            let old = here[x];
            let new = rule.next(old, n);
            next[base + x] = new;
            if is_alive(old) != is_alive(new) {
                changes.push((base + x) as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::ALIVE;

    fn grid(dims: Dims, live: &[(usize, usize)]) -> Vec<u8> {
        let mut state = vec![0u8; dims.cell_count()];
        for &(x, y) in live {
            state[dims.index(x, y).unwrap()] = ALIVE;
        }
        state
    }

    fn live_cells(dims: Dims, state: &[u8]) -> Vec<(usize, usize)> {
        (0..state.len())
            .filter(|&i| is_alive(state[i]))
            .map(|i| dims.coords(i).unwrap())
            .collect()
    }

    // ── Oscillators and still lifes ─────────────────────────────

    #[test]
    fn blinker_alternates() {
        let dims = Dims::new(5, 5);
        let mut s = GridStepper::new(dims, Topology::Bounded);
        s.load(&grid(dims, &[(1, 2), (2, 2), (3, 2)])).unwrap();

        let out = s.step();
        assert_eq!(live_cells(dims, out.state), vec![(2, 1), (2, 2), (2, 3)]);
        // (1,2) and (3,2) die; (2,1) and (2,3) are born.
        assert_eq!(out.changes, &[7, 11, 13, 17]);

        let out = s.step();
        assert_eq!(live_cells(dims, out.state), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn block_is_still() {
        let dims = Dims::new(4, 4);
        let block = grid(dims, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
        let mut s = GridStepper::new(dims, Topology::Bounded);
        s.load(&block).unwrap();
        let out = s.step();
        assert_eq!(out.state, block.as_slice());
        assert!(out.changes.is_empty());
    }

    // ── Degenerate grids ────────────────────────────────────────

    #[test]
    fn empty_and_single_cell_grids() {
        let mut empty = GridStepper::new(Dims::new(0, 0), Topology::Toroidal);
        assert!(empty.step().changes.is_empty());

        let mut wide = GridStepper::new(Dims::new(7, 0), Topology::Bounded);
        assert!(wide.step().state.is_empty());

        let mut one = GridStepper::new(Dims::new(1, 1), Topology::Bounded);
        assert!(one.step().changes.is_empty());
        one.set_cell(0, ALIVE);
        let out = one.step();
        assert_eq!(out.state, &[0]);
        assert_eq!(out.changes, &[0]);
    }

    #[test]
    fn toroidal_single_cell_sees_itself_eight_times() {
        let mut one = GridStepper::new(Dims::new(1, 1), Topology::Toroidal);
        one.set_cell(0, ALIVE);
        // 8 live neighbours: overcrowded.
        assert_eq!(one.step().state, &[0]);
    }

    // ── Topology ────────────────────────────────────────────────

    #[test]
    fn edge_blinker_depends_on_topology() {
        let dims = Dims::new(5, 5);
        let start = grid(dims, &[(0, 2), (0, 1), (0, 3)]);

        let mut bounded = GridStepper::new(dims, Topology::Bounded);
        bounded.load(&start).unwrap();
        assert_eq!(
            live_cells(dims, bounded.step().state),
            vec![(0, 2), (1, 2)]
        );

        let mut torus = GridStepper::new(dims, Topology::Toroidal);
        torus.load(&start).unwrap();
        assert_eq!(
            live_cells(dims, torus.step().state),
            vec![(0, 2), (1, 2), (4, 2)]
        );
    }

    // ── Buffer discipline ───────────────────────────────────────

    #[test]
    fn buffers_alternate_without_reallocation() {
        let dims = Dims::new(8, 8);
        let mut s = GridStepper::new(dims, Topology::Bounded);
        s.load(&grid(dims, &[(1, 2), (2, 2), (3, 2)])).unwrap();
        let ptrs: Vec<*const u8> = (0..4).map(|_| s.step().state.as_ptr()).collect();
        assert_eq!(ptrs[0], ptrs[2]);
        assert_eq!(ptrs[1], ptrs[3]);
        assert_ne!(ptrs[0], ptrs[1]);
    }

    // ── Mutation API ────────────────────────────────────────────

    #[test]
    fn load_rejects_wrong_length() {
        let mut s = GridStepper::new(Dims::new(3, 3), Topology::Bounded);
        assert_eq!(
            s.load(&[0; 4]),
            Err(StepperError::LengthMismatch {
                expected: 9,
                found: 4
            })
        );
    }

    #[test]
    fn set_cell_out_of_range_is_ignored() {
        let mut s = GridStepper::new(Dims::new(2, 2), Topology::Bounded);
        assert!(!s.set_cell(4, ALIVE));
        assert!(s.set_cell(3, ALIVE));
        assert_eq!(s.state(), &[0, 0, 0, 1]);
    }

    #[test]
    fn resize_preserves_overlap() {
        let dims = Dims::new(3, 3);
        let mut s = GridStepper::new(dims, Topology::Bounded);
        s.load(&grid(dims, &[(0, 0), (2, 2), (1, 0)])).unwrap();
        let grown = s.resize(Dims::new(4, 2)).to_vec();
        assert_eq!(grown, vec![1, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(s.dims(), Dims::new(4, 2));
        assert_eq!(s.step().state.len(), 8);
    }

    #[test]
    fn reinit_adopts_new_dims() {
        let mut s = GridStepper::new(Dims::new(2, 2), Topology::Bounded);
        s.reinit(Dims::new(3, 1), vec![1, 1, 1]).unwrap();
        assert_eq!(s.step().state, &[0, 1, 0]);
        assert!(s.reinit(Dims::new(3, 1), vec![1]).is_err());
    }

    #[test]
    fn seeds_rule_variant() {
        let dims = Dims::new(4, 4);
        let mut s = GridStepper::new(dims, Topology::Bounded).with_rule(LifeRule::SEEDS);
        s.load(&grid(dims, &[(1, 1), (2, 1)])).unwrap();
        // B2/S: both parents die, the four cells above/below are born.
        assert_eq!(
            live_cells(dims, s.step().state),
            vec![(1, 0), (2, 0), (1, 2), (2, 2)]
        );
    }
}
