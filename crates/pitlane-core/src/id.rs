//! Strongly-typed counters.

use std::fmt;

/// Monotonically increasing tick counter.
///
/// Incremented each time the simulation advances one fixed step. Reset to
/// zero by `reset` and by car-count changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identity of the per-car state arrays.
///
/// Bumped whenever the arrays are rebuilt (`reset`, `set_car_count`).
/// Hosts holding raw pointers or cached views into the state compare
/// generations to detect that their view was invalidated, even though the
/// storage itself never reallocates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generation(pub u64);

impl Generation {
    /// The generation that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_next_increments() {
        assert_eq!(Generation(3).next(), Generation(4));
    }

    #[test]
    fn generation_next_wraps() {
        assert_eq!(Generation(u64::MAX).next(), Generation(0));
    }

    #[test]
    fn display_is_plain_number() {
        assert_eq!(TickId(42).to_string(), "42");
        assert_eq!(Generation(7).to_string(), "7");
    }
}
