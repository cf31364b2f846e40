//! Grid edge topology.

/// How the grid treats neighbours that fall off its edges.
///
/// Topology affects neighbour lookup only; storage layout is the same
/// row-major buffer in both modes.
///
/// # Examples
///
/// ```
/// use lifegrid_core::Topology;
///
/// assert_eq!(Topology::Bounded.resolve_axis(-1, 5), None);
/// assert_eq!(Topology::Toroidal.resolve_axis(-1, 5), Some(4));
/// assert_eq!(Topology::Toroidal.resolve_axis(5, 5), Some(0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Off-grid neighbours are absent and contribute nothing.
    #[default]
    Bounded,
    /// Edges wrap: left meets right, top meets bottom (torus).
    Toroidal,
}

impl Topology {
    /// Topology for a "wrap edges" flag.
    pub fn from_wrap(wrap: bool) -> Self {
        if wrap {
            Self::Toroidal
        } else {
            Self::Bounded
        }
    }

    /// Whether edges wrap.
    pub fn wraps(self) -> bool {
        self == Self::Toroidal
    }

    /// Resolve a possibly out-of-range axis coordinate.
    ///
    /// Returns `Some(resolved)` inside `[0, len)`, or `None` when the
    /// coordinate is off-grid under [`Topology::Bounded`] or `len == 0`.
    #[inline]
    pub fn resolve_axis(self, val: i64, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let len = len as i64;
        if (0..len).contains(&val) {
            return Some(val as usize);
        }
        match self {
            Self::Bounded => None,
            Self::Toroidal => Some(val.rem_euclid(len) as usize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_in_range() {
        assert_eq!(Topology::Bounded.resolve_axis(2, 5), Some(2));
        assert_eq!(Topology::Bounded.resolve_axis(5, 5), None);
    }

    #[test]
    fn toroidal_wraps_both_sides() {
        assert_eq!(Topology::Toroidal.resolve_axis(-1, 5), Some(4));
        assert_eq!(Topology::Toroidal.resolve_axis(7, 5), Some(2));
    }

    #[test]
    fn zero_length_axis_never_resolves() {
        assert_eq!(Topology::Bounded.resolve_axis(0, 0), None);
        assert_eq!(Topology::Toroidal.resolve_axis(0, 0), None);
    }

    #[test]
    fn wrap_flag_round_trip() {
        assert!(Topology::from_wrap(true).wraps());
        assert!(!Topology::from_wrap(false).wraps());
        assert_eq!(Topology::default(), Topology::Bounded);
    }
}
