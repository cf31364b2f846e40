//! Life-like birth/survival rules in `B…/S…` notation.

use std::fmt;
use std::str::FromStr;

use crate::cell::{is_alive, ALIVE, DEAD};
use crate::error::LifeRuleParseError;

/// An outer-totalistic rule on the 8-cell Moore neighbourhood.
///
/// Bit `n` of `birth` set means a dead cell with `n` live neighbours is
/// born; bit `n` of `survive` set means a live cell with `n` live
/// neighbours stays alive. Every other combination yields a dead cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LifeRule {
    birth: u16,
    survive: u16,
}

impl LifeRule {
    /// Conway's Game of Life, B3/S23.
    pub const CONWAY: Self = Self::from_masks(1 << 3, (1 << 2) | (1 << 3));
    /// HighLife, B36/S23.
    pub const HIGHLIFE: Self = Self::from_masks((1 << 3) | (1 << 6), (1 << 2) | (1 << 3));
    /// Seeds, B2/S.
    pub const SEEDS: Self = Self::from_masks(1 << 2, 0);
    /// Day & Night, B3678/S34678.
    pub const DAY_AND_NIGHT: Self = Self::from_masks(
        (1 << 3) | (1 << 6) | (1 << 7) | (1 << 8),
        (1 << 3) | (1 << 4) | (1 << 6) | (1 << 7) | (1 << 8),
    );

    const MASK: u16 = 0x1ff;

    /// Build a rule from raw birth/survival bitmasks (bits above 8 ignored).
    pub const fn from_masks(birth: u16, survive: u16) -> Self {
        Self {
            birth: birth & Self::MASK,
            survive: survive & Self::MASK,
        }
    }

    /// Parse `B…/S…` notation, e.g. `"B3/S23"` or `"s23/b36"`.
    pub fn parse(text: &str) -> Result<Self, LifeRuleParseError> {
        let text = text.trim();
        let mut birth = None;
        let mut survive = None;
        for part in text.split('/') {
            let part = part.trim();
            let mut chars = part.chars();
            let (slot, which) = match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') => (&mut birth, 'B'),
                Some('S') => (&mut survive, 'S'),
                _ => {
                    return Err(LifeRuleParseError::Malformed {
                        input: text.to_string(),
                    })
                }
            };
            if slot.is_some() {
                return Err(LifeRuleParseError::Duplicate { section: which });
            }
            let mut mask = 0u16;
            for c in chars {
                let n = c
                    .to_digit(10)
                    .filter(|&d| d <= 8)
                    .ok_or(LifeRuleParseError::InvalidCount { found: c })?;
                mask |= 1 << n;
            }
            *slot = Some(mask);
        }
        match (birth, survive) {
            (Some(b), Some(s)) => Ok(Self::from_masks(b, s)),
            _ => Err(LifeRuleParseError::Malformed {
                input: text.to_string(),
            }),
        }
    }

    /// Whether a dead cell with `n` live neighbours is born.
    #[inline]
    pub fn born(&self, n: u8) -> bool {
        n <= 8 && self.birth & (1 << n) != 0
    }

    /// Whether a live cell with `n` live neighbours survives.
    #[inline]
    pub fn survives(&self, n: u8) -> bool {
        n <= 8 && self.survive & (1 << n) != 0
    }

    /// Next value of a cell given its current value and live-neighbour count.
    #[inline]
    pub fn next(&self, current: u8, neighbours: u8) -> u8 {
        let alive = if is_alive(current) {
            self.survives(neighbours)
        } else {
            self.born(neighbours)
        };
        if alive {
            ALIVE
        } else {
            DEAD
        }
    }
}

impl Default for LifeRule {
    fn default() -> Self {
        Self::CONWAY
    }
}

impl FromStr for LifeRule {
    type Err = LifeRuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LifeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for n in 0..=8u8 {
            if self.born(n) {
                write!(f, "{n}")?;
            }
        }
        write!(f, "/S")?;
        for n in 0..=8u8 {
            if self.survives(n) {
                write!(f, "{n}")?;
            }
        }
        Ok(())
    }
}
