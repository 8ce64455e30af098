//! Ball identifiers and clock-wide time constants.
//!
//! A ball is an immutable value: the simulation moves balls between
//! containers but never creates, duplicates, or destroys one after the
//! main queue has been populated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Simulated minutes in one hour.
pub const MINUTES_PER_HOUR: u64 = 60;

/// Simulated minutes in one day. Elapsed days are always reported as
/// `elapsed_minutes / MINUTES_PER_DAY` (integer division).
pub const MINUTES_PER_DAY: u64 = 1440;

/// A numbered ball circulating through the clock.
///
/// Balls are numbered `1..=N` where `N` is the configured ball count.
/// Serializes as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ball(u16);

impl Ball {
    /// Create a ball with the given number.
    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    /// Return the ball's number.
    pub const fn number(self) -> u16 {
        self.0
    }
}

impl From<u16> for Ball {
    fn from(number: u16) -> Self {
        Self(number)
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_serializes_as_bare_number() {
        let json = serde_json::to_string(&Ball::new(17)).ok();
        assert_eq!(json.as_deref(), Some("17"));
    }

    #[test]
    fn balls_order_by_number() {
        assert!(Ball::new(3) < Ball::new(12));
        assert_eq!(Ball::from(9).number(), 9);
        assert_eq!(Ball::new(42).to_string(), "42");
    }
}
