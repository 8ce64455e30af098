//! Holding tracks and the overflow cascade.
//!
//! A track accepts balls until it is full. The ball that finds it full
//! triggers a cascade: the track is drained completely back onto the main
//! queue in pop order (last pushed first), and the triggering ball moves
//! on. For the minute and five-minute tracks it continues to the next
//! track; for the hour track it follows the drained balls onto the queue.
//! The triggering ball never lands on the track it emptied.

use ballclock_types::{Ball, TrackLevel};
use tracing::trace;

use crate::container::{BallQueue, BallStack, BoundedContainer, ContainerError};

/// What happened to a ball handed to [`Track::accept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The ball came to rest on the track.
    Accepted,

    /// The track overflowed and drained; `carry` continues to `to`.
    Forward {
        /// The triggering ball.
        carry: Ball,
        /// The level that must receive it.
        to: TrackLevel,
    },

    /// The last track overflowed; the drained balls and then the
    /// triggering ball are all back on the main queue.
    Returned {
        /// Number of balls drained from the track (excluding the trigger).
        drained: usize,
    },
}

/// A capacity-limited LIFO track at one [`TrackLevel`].
#[derive(Debug)]
pub struct Track {
    level: TrackLevel,
    stack: BallStack,
}

impl Track {
    /// Create an empty track sized for `level`.
    pub fn new(level: TrackLevel) -> Self {
        Self {
            level,
            stack: BallStack::new(level.capacity()),
        }
    }

    /// The track's level.
    pub const fn level(&self) -> TrackLevel {
        self.level
    }

    /// Balls currently on the track.
    pub fn size(&self) -> usize {
        self.stack.size()
    }

    /// Track contents, bottom to top.
    pub fn contents(&self) -> Vec<Ball> {
        self.stack.contents()
    }

    /// Place `ball` on the track, cascading into `queue` on overflow.
    ///
    /// # Errors
    ///
    /// Returns the queue's [`ContainerError`] if it refuses a returning
    /// ball. That can only happen when balls have been duplicated
    /// somewhere, so the caller should treat it as fatal.
    pub fn accept(&self, ball: Ball, queue: &BallQueue) -> Result<TrackOutcome, ContainerError> {
        match self.stack.push(ball) {
            Ok(()) => return Ok(TrackOutcome::Accepted),
            Err(ContainerError::CapacityExceeded { .. }) => {}
            Err(other) => return Err(other),
        }

        let drained = self.drain_into(queue)?;
        trace!(level = %self.level, trigger = %ball, drained, "track cascade");

        match self.level.next() {
            Some(to) => Ok(TrackOutcome::Forward { carry: ball, to }),
            None => {
                queue.push(ball)?;
                Ok(TrackOutcome::Returned { drained })
            }
        }
    }

    /// Pop every ball onto `queue` until the track reports empty.
    fn drain_into(&self, queue: &BallQueue) -> Result<usize, ContainerError> {
        let mut drained: usize = 0;
        loop {
            match self.stack.pop() {
                Ok(ball) => {
                    if let Err(err) = queue.push(ball) {
                        // Put it back so the ball is not lost with the error.
                        let _ = self.stack.push(ball);
                        return Err(err);
                    }
                    drained = drained.saturating_add(1);
                }
                Err(ContainerError::Empty) => return Ok(drained),
                Err(other) => return Err(other),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn balls(numbers: &[u16]) -> Vec<Ball> {
        numbers.iter().copied().map(Ball::new).collect()
    }

    #[test]
    fn accepts_until_full() {
        let track = Track::new(TrackLevel::Minute);
        let queue = BallQueue::new(30);
        for n in 1..=4 {
            assert_eq!(track.accept(Ball::new(n), &queue).unwrap(), TrackOutcome::Accepted);
        }
        assert_eq!(track.size(), 4);
        assert_eq!(queue.size(), 0);
    }

    #[test]
    fn overflow_drains_in_reverse_and_forwards_trigger() {
        let track = Track::new(TrackLevel::Minute);
        let queue = BallQueue::new(30);
        queue.push(Ball::new(20)).unwrap();
        for n in [1, 2, 3, 4] {
            let _ = track.accept(Ball::new(n), &queue).unwrap();
        }

        let outcome = track.accept(Ball::new(5), &queue).unwrap();

        assert_eq!(
            outcome,
            TrackOutcome::Forward {
                carry: Ball::new(5),
                to: TrackLevel::FiveMinute,
            }
        );
        assert_eq!(track.size(), 0);
        // Drained balls land behind what was already queued, last pushed first.
        assert_eq!(queue.contents(), balls(&[20, 4, 3, 2, 1]));
    }

    #[test]
    fn five_minute_overflow_forwards_to_hour() {
        let track = Track::new(TrackLevel::FiveMinute);
        let queue = BallQueue::new(30);
        for n in 1..=11 {
            let _ = track.accept(Ball::new(n), &queue).unwrap();
        }
        let outcome = track.accept(Ball::new(12), &queue).unwrap();
        assert_eq!(
            outcome,
            TrackOutcome::Forward {
                carry: Ball::new(12),
                to: TrackLevel::Hour,
            }
        );
        assert_eq!(queue.contents(), balls(&[11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]));
    }

    #[test]
    fn hour_overflow_returns_trigger_after_drained_balls() {
        let track = Track::new(TrackLevel::Hour);
        let queue = BallQueue::new(30);
        for n in 1..=11 {
            let _ = track.accept(Ball::new(n), &queue).unwrap();
        }

        let outcome = track.accept(Ball::new(12), &queue).unwrap();

        assert_eq!(outcome, TrackOutcome::Returned { drained: 11 });
        assert_eq!(track.size(), 0);
        assert_eq!(
            queue.contents(),
            balls(&[11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 12])
        );
    }

    #[test]
    fn trigger_never_rests_on_emptied_track() {
        let track = Track::new(TrackLevel::Minute);
        let queue = BallQueue::new(30);
        for n in 1..=5 {
            let _ = track.accept(Ball::new(n), &queue).unwrap();
        }
        assert!(track.contents().is_empty());
        assert!(!queue.contents().contains(&Ball::new(5)));
    }

    #[test]
    fn full_queue_surfaces_as_error() {
        let track = Track::new(TrackLevel::Minute);
        let queue = BallQueue::new(1);
        queue.push(Ball::new(99)).unwrap();
        for n in 1..=4 {
            let _ = track.accept(Ball::new(n), &queue).unwrap();
        }
        let err = track.accept(Ball::new(5), &queue).unwrap_err();
        assert_eq!(err, ContainerError::CapacityExceeded { capacity: 1 });
        assert_eq!(track.size(), 4);
    }
}
