//! Point-in-time view of the whole clock.

use serde::{Deserialize, Serialize};

use crate::Ball;

/// Contents of every container at one instant.
///
/// Track lists are ordered bottom to top (first pushed first). The main
/// queue is ordered front to back (next ball to be released first).
///
/// Fields are declared in the key order of the JSON document produced for
/// time-limited runs: `{"fivemin":[..],"hour":[..],"main":[..],"min":[..]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    /// Five-minute track contents.
    #[serde(rename = "fivemin")]
    pub five_minute: Vec<Ball>,
    /// Hour track contents.
    pub hour: Vec<Ball>,
    /// Main queue contents.
    pub main: Vec<Ball>,
    /// Minute track contents.
    #[serde(rename = "min")]
    pub minute: Vec<Ball>,
}

impl ClockSnapshot {
    /// Total number of balls across all four containers.
    pub fn total_balls(&self) -> usize {
        self.five_minute
            .len()
            .saturating_add(self.hour.len())
            .saturating_add(self.main.len())
            .saturating_add(self.minute.len())
    }

    /// Iterate over every ball in the snapshot, tracks first.
    pub fn balls(&self) -> impl Iterator<Item = Ball> + '_ {
        self.minute
            .iter()
            .chain(&self.five_minute)
            .chain(&self.hour)
            .chain(&self.main)
            .copied()
    }
}
