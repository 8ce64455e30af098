//! The three holding track levels of the clock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three last-in-first-out holding tracks.
///
/// Balls enter at [`TrackLevel::Minute`] and only move to the next level
/// when the current track overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackLevel {
    /// One-minute track, holds 4 balls.
    Minute,
    /// Five-minute track, holds 11 balls.
    FiveMinute,
    /// One-hour track, holds 11 balls.
    Hour,
}

impl TrackLevel {
    /// All levels in feed order.
    pub const ALL: [Self; 3] = [Self::Minute, Self::FiveMinute, Self::Hour];

    /// Maximum number of balls the track at this level can hold.
    pub const fn capacity(self) -> usize {
        match self {
            Self::Minute => 4,
            Self::FiveMinute | Self::Hour => 11,
        }
    }

    /// The level that receives the triggering ball when this track
    /// overflows. `None` for the hour track, whose triggering ball goes
    /// back to the main queue.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Minute => Some(Self::FiveMinute),
            Self::FiveMinute => Some(Self::Hour),
            Self::Hour => None,
        }
    }

    /// Short name used in logs and snapshots.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Minute => "min",
            Self::FiveMinute => "fivemin",
            Self::Hour => "hour",
        }
    }
}

impl fmt::Display for TrackLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities_match_clock_design() {
        assert_eq!(TrackLevel::Minute.capacity(), 4);
        assert_eq!(TrackLevel::FiveMinute.capacity(), 11);
        assert_eq!(TrackLevel::Hour.capacity(), 11);
    }

    #[test]
    fn levels_chain_downstream() {
        assert_eq!(TrackLevel::Minute.next(), Some(TrackLevel::FiveMinute));
        assert_eq!(TrackLevel::FiveMinute.next(), Some(TrackLevel::Hour));
        assert_eq!(TrackLevel::Hour.next(), None);
    }

    #[test]
    fn total_track_capacity_is_below_minimum_ball_count() {
        let total: usize = TrackLevel::ALL.iter().map(|l| l.capacity()).sum();
        assert_eq!(total, 26);
    }
}
