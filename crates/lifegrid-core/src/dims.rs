//! Grid dimensions, row-major indexing, and overlap-preserving resize.

use std::fmt;

/// Dimensions of a row-major grid: `cols` cells per row, `rows` rows.
///
/// Zero-sized dimensions are legal and describe an empty grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dims {
    /// Number of columns (width).
    pub cols: usize,
    /// Number of rows (height).
    pub rows: usize,
}

impl Dims {
    /// Largest cell count the engine accepts; change-list indices are `u32`.
    pub const MAX_CELLS: usize = u32::MAX as usize;

    /// Create a new set of dimensions.
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells, `cols * rows`.
    ///
    /// Saturates instead of overflowing; see [`Dims::checked_cell_count`].
    pub fn cell_count(&self) -> usize {
        self.cols.saturating_mul(self.rows)
    }

    /// Cell count if it fits within [`Dims::MAX_CELLS`].
    pub fn checked_cell_count(&self) -> Option<usize> {
        self.cols
            .checked_mul(self.rows)
            .filter(|&n| n <= Self::MAX_CELLS)
    }

    /// Whether the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    /// Row-major index of `(x, y)`, or `None` if out of range.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        self.contains(x, y).then(|| y * self.cols + x)
    }

    /// Coordinates `(x, y)` of a row-major index, or `None` if out of range.
    pub fn coords(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.cell_count()).then(|| (index % self.cols, index / self.cols))
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Copy `src` (laid out as `from`) into a fresh buffer laid out as `to`.
///
/// The overlapping top-left sub-rectangle is preserved cell for cell;
/// every cell outside it is `T::default()`.
///
/// # Panics
///
/// Panics if `src.len() != from.cell_count()`.
pub fn resize_preserving<T: Copy + Default>(src: &[T], from: Dims, to: Dims) -> Vec<T> {
    assert_eq!(
        src.len(),
        from.cell_count(),
        "source buffer does not match its dimensions"
    );
    let mut out = vec![T::default(); to.cell_count()];
    let overlap_cols = from.cols.min(to.cols);
    let overlap_rows = from.rows.min(to.rows);
    if overlap_cols == 0 {
        return out;
    }
    for y in 0..overlap_rows {
        let src_row = y * from.cols;
        let dst_row = y * to.cols;
        out[dst_row..dst_row + overlap_cols]
            .copy_from_slice(&src[src_row..src_row + overlap_cols]);
    }
    out
}

/// Clamp caller-supplied dimensions into `[1, max]` on each axis.
///
/// The engine accepts any non-negative size; this is the validation a
/// UI boundary applies before calling `resize`.
pub fn clamp_dims(cols: i64, rows: i64, max: Dims) -> Dims {
    let clamp = |v: i64, hi: usize| -> usize {
        let hi = hi.max(1);
        if v < 1 {
            1
        } else {
            (v as u64).min(hi as u64) as usize
        }
    };
    Dims::new(clamp(cols, max.cols), clamp(rows, max.rows))
}
