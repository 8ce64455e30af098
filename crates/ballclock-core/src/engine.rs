//! The sequential tick engine.
//!
//! Each tick releases one ball from the front of the main queue and feeds
//! it through the tracks: minute, then five-minute on a minute cascade,
//! then hour on a five-minute cascade. Only an hour cascade can restore
//! the starting order, so the origin comparison runs only then.
//!
//! # States
//!
//! ```text
//! Running --(hour cascade, queue == origin)--> CycleDetected
//! Running --(elapsed minutes == limit)-------> TimeLimitReached
//! ```
//!
//! Both terminal states are permanent. The elapsed-minute counter is the
//! only source of simulated time: it advances once per released ball and
//! never on a tick that found the queue empty.

use std::num::NonZeroU64;

use ballclock_types::{Ball, ClockSnapshot, MINUTES_PER_DAY, TrackLevel};
use tracing::{debug, info, trace};

use crate::config::{ClockConfig, ConfigError};
use crate::container::ContainerError;
use crate::mechanism::{ClockMechanism, ClockReading};
use crate::track::TrackOutcome;

/// Errors that can occur while driving the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration was rejected before the run started.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The main queue refused a ball returning from a track.
    #[error("main queue rejected a ball from the {level} track: {source}")]
    QueueRejected {
        /// The track that was draining.
        level: TrackLevel,
        /// The underlying container error.
        source: ContainerError,
    },

    /// The elapsed-minute counter would overflow.
    #[error("elapsed minute counter overflow")]
    MinuteOverflow,

    /// `tick` was called after the engine reached a terminal state.
    #[error("engine already halted in state {state:?}")]
    Halted {
        /// The terminal state.
        state: EngineState,
    },
}

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Ticks are being processed.
    Running,
    /// The main queue returned to its starting order.
    CycleDetected,
    /// The configured run limit was reached first.
    TimeLimitReached,
}

impl EngineState {
    /// Whether the engine has stopped for good.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Result of a single [`SimulationEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The main queue was empty; no ball moved and no time passed.
    Idle,
    /// One minute passed and the engine is still running.
    Advanced {
        /// Elapsed minutes after this tick.
        minute: u64,
    },
    /// One minute passed and the starting order recurred.
    CycleDetected {
        /// Elapsed minutes at detection.
        minute: u64,
    },
    /// The run limit was reached.
    TimeLimitReached {
        /// Elapsed minutes when the limit was reached.
        minute: u64,
    },
}

/// Sequential simulation of one ball clock.
///
/// Owns every container and counter of the run; construct a fresh engine
/// per run.
#[derive(Debug)]
pub struct SimulationEngine {
    mechanism: ClockMechanism,
    elapsed_minutes: u64,
    run_limit: Option<NonZeroU64>,
    state: EngineState,
}

impl SimulationEngine {
    /// Validate `config` and build an engine with balls `1..=N` queued.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the ball count is out of range.
    pub fn new(config: &ClockConfig) -> Result<Self, EngineError> {
        let mechanism = ClockMechanism::new(config)?;
        debug!(
            ball_count = config.ball_count,
            run_minutes = config.run_minutes,
            "Engine initialized"
        );
        Ok(Self {
            mechanism,
            elapsed_minutes: 0,
            run_limit: config.run_limit(),
            state: EngineState::Running,
        })
    }

    /// Advance simulated time by one minute.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Halted`] if the engine is in a terminal
    /// state, [`EngineError::QueueRejected`] if a cascade could not return
    /// a ball to the main queue, or [`EngineError::MinuteOverflow`].
    pub fn tick(&mut self) -> Result<TickOutcome, EngineError> {
        if self.state.is_terminal() {
            return Err(EngineError::Halted { state: self.state });
        }

        let ball = match self.mechanism.release() {
            Ok(ball) => ball,
            Err(_empty) => {
                trace!(minute = self.elapsed_minutes, "Main queue empty, idle tick");
                return Ok(self.check_limit().unwrap_or(TickOutcome::Idle));
            }
        };

        self.elapsed_minutes = self
            .elapsed_minutes
            .checked_add(1)
            .ok_or(EngineError::MinuteOverflow)?;
        let minute = self.elapsed_minutes;

        if self.feed(ball)? && self.mechanism.matches_origin() {
            self.state = EngineState::CycleDetected;
            info!(
                ball_count = self.mechanism.ball_count(),
                minute,
                days = self.elapsed_days(),
                "Starting order recurred"
            );
            return Ok(TickOutcome::CycleDetected { minute });
        }

        Ok(self
            .check_limit()
            .unwrap_or(TickOutcome::Advanced { minute }))
    }

    /// Feed `ball` through the tracks, starting at the minute track.
    ///
    /// Returns `true` if the tick ended with an hour-track cascade.
    fn feed(&self, ball: Ball) -> Result<bool, EngineError> {
        let mut level = TrackLevel::Minute;
        let mut ball = ball;
        loop {
            let outcome = self
                .mechanism
                .track(level)
                .accept(ball, self.mechanism.queue())
                .map_err(|source| EngineError::QueueRejected { level, source })?;
            match outcome {
                TrackOutcome::Accepted => return Ok(false),
                TrackOutcome::Forward { carry, to } => {
                    level = to;
                    ball = carry;
                }
                TrackOutcome::Returned { drained } => {
                    debug!(
                        minute = self.elapsed_minutes,
                        trigger = %ball,
                        drained,
                        "Hour track cascade"
                    );
                    return Ok(true);
                }
            }
        }
    }

    /// Halt if the run limit has been reached.
    fn check_limit(&mut self) -> Option<TickOutcome> {
        let limit = self.run_limit?;
        if self.elapsed_minutes < limit.get() {
            return None;
        }
        self.state = EngineState::TimeLimitReached;
        info!(
            minute = self.elapsed_minutes,
            limit = limit.get(),
            "Run limit reached"
        );
        Some(TickOutcome::TimeLimitReached {
            minute: self.elapsed_minutes,
        })
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Minutes simulated so far.
    pub const fn elapsed_minutes(&self) -> u64 {
        self.elapsed_minutes
    }

    /// Whole days simulated so far.
    pub const fn elapsed_days(&self) -> u64 {
        match self.elapsed_minutes.checked_div(MINUTES_PER_DAY) {
            Some(days) => days,
            None => 0,
        }
    }

    /// Configured run limit, if any.
    pub const fn run_limit(&self) -> Option<NonZeroU64> {
        self.run_limit
    }

    /// Configured number of balls.
    pub const fn ball_count(&self) -> u16 {
        self.mechanism.ball_count()
    }

    /// The containers driven by this engine.
    pub const fn mechanism(&self) -> &ClockMechanism {
        &self.mechanism
    }

    /// Copy of every container's contents.
    pub fn snapshot(&self) -> ClockSnapshot {
        self.mechanism.snapshot()
    }

    /// The time shown on the clock face.
    pub fn reading(&self) -> ClockReading {
        self.mechanism.reading()
    }
}
