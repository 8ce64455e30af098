//! The assembled clock: main queue, three tracks, and origin snapshot.
//!
//! [`ClockMechanism`] holds every container of one simulation run and
//! nothing else. The sequential [`SimulationEngine`] owns one directly;
//! the task [`pipeline`] shares one between its tasks behind an `Arc`.
//! Either way there is no process-wide state, so independent runs can
//! coexist in one process.
//!
//! [`SimulationEngine`]: crate::engine::SimulationEngine
//! [`pipeline`]: crate::pipeline

use std::collections::BTreeSet;

use ballclock_types::{Ball, ClockSnapshot, TrackLevel};

use crate::config::{ClockConfig, ConfigError};
use crate::container::{BallQueue, BoundedContainer, ContainerError};
use crate::track::Track;

/// Errors reported by [`ClockMechanism::verify_inventory`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// The containers hold a different number of balls than configured.
    #[error("expected {expected} balls across all containers, found {found}")]
    CountMismatch {
        /// Configured ball count.
        expected: usize,
        /// Balls actually present.
        found: usize,
    },

    /// A ball appears in more than one place.
    #[error("ball {ball} is present more than once")]
    Duplicate {
        /// The duplicated ball.
        ball: Ball,
    },

    /// A ball outside `1..=N` is present.
    #[error("ball {ball} is outside the configured range 1..={ball_count}")]
    OutOfRange {
        /// The unexpected ball.
        ball: Ball,
        /// Configured ball count.
        ball_count: u16,
    },
}

/// Immutable copy of the main queue's order, captured once after the
/// queue is populated and before the first tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginSnapshot {
    order: Box<[Ball]>,
}

impl OriginSnapshot {
    /// Capture the current order of `queue`.
    pub fn capture(queue: &BallQueue) -> Self {
        Self {
            order: queue.contents().into_boxed_slice(),
        }
    }

    /// Whether `queue` currently holds exactly the captured order.
    pub fn matches(&self, queue: &BallQueue) -> bool {
        queue.matches(&self.order)
    }

    /// The captured order.
    pub fn order(&self) -> &[Ball] {
        &self.order
    }
}

/// The face value a physical clock would display.
///
/// The hour track of the physical clock carries one fixed ball that never
/// leaves it, so the displayed hour is one more than the number of moving
/// balls on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    /// Displayed hour, `1..=12`.
    pub hours: u8,
    /// Displayed minutes past the hour, `0..=59`.
    pub minutes: u8,
}

impl std::fmt::Display for ClockReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:02}", self.hours, self.minutes)
    }
}

/// All containers of one simulation run.
#[derive(Debug)]
pub struct ClockMechanism {
    ball_count: u16,
    queue: BallQueue,
    minute: Track,
    five_minute: Track,
    hour: Track,
    origin: OriginSnapshot,
}

impl ClockMechanism {
    /// Build a mechanism with balls `1..=N` queued in ascending order and
    /// empty tracks, then capture the origin snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if the ball count is
    /// outside the supported range.
    pub fn new(config: &ClockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ball_count = config.ball_count;
        let queue = BallQueue::new(usize::from(ball_count));
        for number in 1..=ball_count {
            queue
                .push(Ball::new(number))
                .map_err(|err| ConfigError::InvalidConfiguration {
                    reason: format!("could not queue ball {number}: {err}"),
                })?;
        }
        let origin = OriginSnapshot::capture(&queue);

        Ok(Self {
            ball_count,
            queue,
            minute: Track::new(TrackLevel::Minute),
            five_minute: Track::new(TrackLevel::FiveMinute),
            hour: Track::new(TrackLevel::Hour),
            origin,
        })
    }

    /// Configured number of balls.
    pub const fn ball_count(&self) -> u16 {
        self.ball_count
    }

    /// The main queue.
    pub const fn queue(&self) -> &BallQueue {
        &self.queue
    }

    /// The track at `level`.
    pub const fn track(&self, level: TrackLevel) -> &Track {
        match level {
            TrackLevel::Minute => &self.minute,
            TrackLevel::FiveMinute => &self.five_minute,
            TrackLevel::Hour => &self.hour,
        }
    }

    /// The origin snapshot.
    pub const fn origin(&self) -> &OriginSnapshot {
        &self.origin
    }

    /// Take the next ball from the front of the main queue.
    pub fn release(&self) -> Result<Ball, ContainerError> {
        self.queue.pop()
    }

    /// Whether the main queue is back in its starting order.
    pub fn matches_origin(&self) -> bool {
        self.origin.matches(&self.queue)
    }

    /// Copy the contents of every container.
    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            five_minute: self.five_minute.contents(),
            hour: self.hour.contents(),
            main: self.queue.contents(),
            minute: self.minute.contents(),
        }
    }

    /// Balls across all four containers.
    pub fn total_balls(&self) -> usize {
        self.queue
            .size()
            .saturating_add(self.minute.size())
            .saturating_add(self.five_minute.size())
            .saturating_add(self.hour.size())
    }

    /// The time shown on the clock face.
    pub fn reading(&self) -> ClockReading {
        let fives = u8::try_from(self.five_minute.size()).unwrap_or(u8::MAX);
        let ones = u8::try_from(self.minute.size()).unwrap_or(u8::MAX);
        let hours = u8::try_from(self.hour.size()).unwrap_or(u8::MAX);
        ClockReading {
            hours: hours.saturating_add(1),
            minutes: fives.saturating_mul(5).saturating_add(ones),
        }
    }

    /// Check that the containers together hold exactly the balls `1..=N`,
    /// each once.
    ///
    /// # Errors
    ///
    /// Returns the first [`InventoryError`] found.
    pub fn verify_inventory(&self) -> Result<(), InventoryError> {
        let snapshot = self.snapshot();
        let expected = usize::from(self.ball_count);
        let found = snapshot.total_balls();
        if found != expected {
            return Err(InventoryError::CountMismatch { expected, found });
        }

        let mut seen = BTreeSet::new();
        for ball in snapshot.balls() {
            if !(1..=self.ball_count).contains(&ball.number()) {
                return Err(InventoryError::OutOfRange {
                    ball,
                    ball_count: self.ball_count,
                });
            }
            if !seen.insert(ball) {
                return Err(InventoryError::Duplicate { ball });
            }
        }
        Ok(())
    }
}
