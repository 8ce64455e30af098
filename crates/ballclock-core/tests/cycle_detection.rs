//! Integration tests for full-cycle detection and time-limited runs.
//!
//! Reference values come from the classic ball clock puzzle: 30 balls
//! cycle after 15 days and 45 balls after 378 days.

#![allow(clippy::unwrap_used)]

use ballclock_core::config::{ClockConfig, ConfigError};
use ballclock_core::engine::{EngineError, EngineState, SimulationEngine};
use ballclock_core::runner::{NoOpCallback, SimulationEndReason, run_simulation};
use ballclock_types::{Ball, MINUTES_PER_DAY};

fn run(ball_count: u16, run_minutes: u64) -> ballclock_core::runner::SimulationResult {
    let mut engine = SimulationEngine::new(&ClockConfig::new(ball_count, run_minutes)).unwrap();
    run_simulation(&mut engine, &mut NoOpCallback).unwrap()
}

fn balls(numbers: &[u16]) -> Vec<Ball> {
    numbers.iter().copied().map(Ball::new).collect()
}

#[test]
fn thirty_balls_cycle_after_fifteen_days() {
    let result = run(30, 0);
    assert_eq!(result.end_reason, SimulationEndReason::CycleDetected);
    assert_eq!(result.elapsed_minutes, 15 * MINUTES_PER_DAY);
    assert_eq!(result.elapsed_days(), 15);
}

#[test]
fn forty_five_balls_cycle_after_378_days() {
    let result = run(45, 0);
    assert_eq!(result.end_reason, SimulationEndReason::CycleDetected);
    assert_eq!(result.elapsed_days(), 378);
}

#[test]
fn twenty_seven_balls_cycle_after_23_days() {
    let result = run(27, 0);
    assert_eq!(result.end_reason, SimulationEndReason::CycleDetected);
    assert_eq!(result.elapsed_minutes, 23 * MINUTES_PER_DAY);
}

#[test]
fn cycle_restores_ascending_queue_and_empty_tracks() {
    let result = run(30, 0);
    assert_eq!(result.snapshot.main, (1..=30).map(Ball::new).collect::<Vec<_>>());
    assert!(result.snapshot.minute.is_empty());
    assert!(result.snapshot.five_minute.is_empty());
    assert!(result.snapshot.hour.is_empty());
}

#[test]
fn thirty_balls_after_325_minutes() {
    let result = run(30, 325);
    assert_eq!(result.end_reason, SimulationEndReason::TimeLimitReached);
    assert_eq!(result.elapsed_minutes, 325);
    assert!(result.snapshot.minute.is_empty());
    assert_eq!(result.snapshot.five_minute, balls(&[22, 13, 25, 3, 7]));
    assert_eq!(result.snapshot.hour, balls(&[6, 12, 17, 4, 15]));
    assert_eq!(
        result.snapshot.main,
        balls(&[
            11, 5, 26, 18, 2, 30, 19, 8, 24, 10, 29, 20, 16, 21, 28, 1, 23, 14, 27, 9
        ])
    );
}

#[test]
fn time_limit_snapshot_serializes_like_original_tool() {
    let result = run(30, 325);
    let json = serde_json::to_string(&result.snapshot).unwrap();
    assert_eq!(
        json,
        r#"{"fivemin":[22,13,25,3,7],"hour":[6,12,17,4,15],"main":[11,5,26,18,2,30,19,8,24,10,29,20,16,21,28,1,23,14,27,9],"min":[]}"#
    );
}

#[test]
fn twenty_seven_balls_after_one_hour() {
    let result = run(27, 60);
    assert!(result.snapshot.minute.is_empty());
    assert!(result.snapshot.five_minute.is_empty());
    assert_eq!(result.snapshot.hour, balls(&[24]));
    assert_eq!(result.snapshot.main.len(), 26);
}

#[test]
fn boundary_ball_counts() {
    for rejected in [0, 26, 128, 500] {
        let err = SimulationEngine::new(&ClockConfig::new(rejected, 0)).unwrap_err();
        assert!(
            matches!(
                err,
                EngineError::Config {
                    source: ConfigError::InvalidConfiguration { .. }
                }
            ),
            "ball count {rejected} should be rejected"
        );
    }

    for accepted in [27, 127] {
        let result = run(accepted, 2 * MINUTES_PER_DAY);
        assert_eq!(result.end_reason, SimulationEndReason::TimeLimitReached);
        assert_eq!(result.snapshot.total_balls(), usize::from(accepted));
    }
}

#[test]
fn halted_engine_refuses_further_ticks() {
    let mut engine = SimulationEngine::new(&ClockConfig::new(30, 0)).unwrap();
    let _ = run_simulation(&mut engine, &mut NoOpCallback).unwrap();
    assert_eq!(engine.state(), EngineState::CycleDetected);
    assert!(matches!(engine.tick(), Err(EngineError::Halted { .. })));
    assert_eq!(engine.elapsed_minutes(), 15 * MINUTES_PER_DAY);
}

#[test]
fn independent_engines_do_not_share_state() {
    let mut first = SimulationEngine::new(&ClockConfig::new(30, 0)).unwrap();
    let mut second = SimulationEngine::new(&ClockConfig::new(45, 100)).unwrap();
    let a = run_simulation(&mut first, &mut NoOpCallback).unwrap();
    let b = run_simulation(&mut second, &mut NoOpCallback).unwrap();
    assert_eq!(a.elapsed_days(), 15);
    assert_eq!(b.elapsed_minutes, 100);
    assert_eq!(b.snapshot.total_balls(), 45);
}
