//! Simulation run loop.
//!
//! [`run_simulation`] drives a [`SimulationEngine`] until it reaches a
//! terminal state and packages the outcome as a [`SimulationResult`]. A
//! [`TickCallback`] observes every tick that moved a ball.

use ballclock_types::{ClockSnapshot, MINUTES_PER_DAY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{EngineError, SimulationEngine, TickOutcome};

/// Errors that can occur during a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },
}

/// Reason a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEndReason {
    /// The main queue returned to its starting order.
    CycleDetected,
    /// The configured run limit was reached first.
    TimeLimitReached,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// Why the run ended.
    pub end_reason: SimulationEndReason,
    /// Configured number of balls.
    pub ball_count: u16,
    /// Minutes simulated.
    pub elapsed_minutes: u64,
    /// Contents of every container when the run ended.
    pub snapshot: ClockSnapshot,
}

impl SimulationResult {
    /// Whole days simulated (`elapsed_minutes / 1440`).
    pub const fn elapsed_days(&self) -> u64 {
        match self.elapsed_minutes.checked_div(MINUTES_PER_DAY) {
            Some(days) => days,
            None => 0,
        }
    }
}

/// Callback invoked after each tick that moved a ball.
pub trait TickCallback: Send {
    /// Called with the tick outcome and the engine after the tick.
    fn on_tick(&mut self, outcome: &TickOutcome, engine: &SimulationEngine);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _outcome: &TickOutcome, _engine: &SimulationEngine) {}
}

/// Logs the clock state once per simulated day.
#[derive(Debug, Default)]
pub struct ProgressCallback {
    last_day: u64,
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, _outcome: &TickOutcome, engine: &SimulationEngine) {
        let day = engine.elapsed_days();
        if day > self.last_day {
            self.last_day = day;
            debug!(
                day,
                minute = engine.elapsed_minutes(),
                in_order = engine.mechanism().matches_origin(),
                "Simulated day complete"
            );
        }
    }
}

/// Run `engine` until the starting order recurs or the run limit is hit.
///
/// With no run limit and a ball count that never cycles this would not
/// return; every ball count in the supported range cycles.
///
/// # Errors
///
/// Returns [`RunnerError::Engine`] if a tick fails.
pub fn run_simulation(
    engine: &mut SimulationEngine,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    info!(
        ball_count = engine.ball_count(),
        run_limit = engine.run_limit().map(std::num::NonZeroU64::get),
        "Simulation starting"
    );

    let end_reason = loop {
        let outcome = engine.tick()?;
        match outcome {
            TickOutcome::Idle => continue,
            TickOutcome::Advanced { .. } => callback.on_tick(&outcome, engine),
            TickOutcome::CycleDetected { .. } => {
                callback.on_tick(&outcome, engine);
                break SimulationEndReason::CycleDetected;
            }
            TickOutcome::TimeLimitReached { .. } => {
                callback.on_tick(&outcome, engine);
                break SimulationEndReason::TimeLimitReached;
            }
        }
    };

    Ok(SimulationResult {
        end_reason,
        ball_count: engine.ball_count(),
        elapsed_minutes: engine.elapsed_minutes(),
        snapshot: engine.snapshot(),
    })
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        ball_count = result.ball_count,
        elapsed_minutes = result.elapsed_minutes,
        elapsed_days = result.elapsed_days(),
        "Simulation ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClockConfig;

    fn engine(ball_count: u16, run_minutes: u64) -> SimulationEngine {
        SimulationEngine::new(&ClockConfig::new(ball_count, run_minutes)).unwrap()
    }

    #[test]
    fn bounded_by_run_limit() {
        let mut engine = engine(30, 5);
        let result = run_simulation(&mut engine, &mut NoOpCallback).unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::TimeLimitReached);
        assert_eq!(result.elapsed_minutes, 5);
        assert_eq!(result.snapshot.total_balls(), 30);
    }

    #[test]
    fn unbounded_run_detects_cycle() {
        let mut engine = engine(30, 0);
        let result = run_simulation(&mut engine, &mut NoOpCallback).unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::CycleDetected);
        assert_eq!(result.elapsed_days(), 15);
        assert_eq!(result.snapshot.main.len(), 30);
    }

    #[test]
    fn tick_callback_is_called() {
        struct CountCallback {
            count: u64,
        }
        impl TickCallback for CountCallback {
            fn on_tick(&mut self, _outcome: &TickOutcome, _engine: &SimulationEngine) {
                self.count = self.count.saturating_add(1);
            }
        }

        let mut engine = engine(27, 3);
        let mut cb = CountCallback { count: 0 };
        let _ = run_simulation(&mut engine, &mut cb).unwrap();
        assert_eq!(cb.count, 3);
    }

    #[test]
    fn progress_callback_tracks_days() {
        let mut engine = engine(30, 3000);
        let mut cb = ProgressCallback::default();
        let _ = run_simulation(&mut engine, &mut cb).unwrap();
        assert_eq!(cb.last_day, 2);
    }

    #[test]
    fn end_reason_serializes_snake_case() {
        let json = serde_json::to_string(&SimulationEndReason::CycleDetected).unwrap();
        assert_eq!(json, r#""cycle_detected""#);
    }
}
