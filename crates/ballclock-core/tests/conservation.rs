//! Property tests: no ball is ever lost or duplicated, for every
//! supported ball count.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use ballclock_core::config::{ClockConfig, MAX_BALLS, MIN_BALLS};
use ballclock_core::engine::SimulationEngine;
use ballclock_types::Ball;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn balls_are_conserved(ball_count in MIN_BALLS..=MAX_BALLS, ticks in 1u64..2_000) {
        let mut engine = SimulationEngine::new(&ClockConfig::new(ball_count, 0)).unwrap();
        let expected: BTreeSet<Ball> = (1..=ball_count).map(Ball::new).collect();

        for _ in 0..ticks {
            let _ = engine.tick().unwrap();
            prop_assert_eq!(engine.mechanism().total_balls(), usize::from(ball_count));
        }

        let snapshot = engine.snapshot();
        let present: Vec<Ball> = snapshot.balls().collect();
        let unique: BTreeSet<Ball> = present.iter().copied().collect();
        prop_assert_eq!(present.len(), unique.len());
        prop_assert_eq!(unique, expected);
        prop_assert!(engine.mechanism().verify_inventory().is_ok());
    }

    #[test]
    fn track_capacities_are_never_exceeded(ball_count in MIN_BALLS..=MAX_BALLS, ticks in 1u64..3_000) {
        let mut engine = SimulationEngine::new(&ClockConfig::new(ball_count, 0)).unwrap();
        for _ in 0..ticks {
            let _ = engine.tick().unwrap();
            let snapshot = engine.snapshot();
            prop_assert!(snapshot.minute.len() <= 4);
            prop_assert!(snapshot.five_minute.len() <= 11);
            prop_assert!(snapshot.hour.len() <= 11);
        }
    }

    #[test]
    fn origin_matches_before_first_tick(ball_count in MIN_BALLS..=MAX_BALLS) {
        let engine = SimulationEngine::new(&ClockConfig::new(ball_count, 0)).unwrap();
        prop_assert!(engine.mechanism().matches_origin());
        prop_assert_eq!(engine.elapsed_minutes(), 0);
    }
}
