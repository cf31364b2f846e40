//! Strongly-typed counters: [`Generation`] and [`Epoch`].

use std::fmt;

/// Monotonically increasing generation counter.
///
/// Incremented once per committed step; reset to zero by `reset`,
/// `randomize`, `resize` and `load_state`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The next generation.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies one "version" of canonical state.
///
/// Every wholesale state replacement (reset, randomize, resize, load)
/// advances the epoch. Step requests are stamped with the epoch current
/// at dispatch; a result stamped with an older epoch was computed from
/// state that no longer exists and must be discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The next epoch. Never wraps in practice.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
