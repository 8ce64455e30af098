//! Rendering of run results for standard output.
//!
//! An unbounded run prints one human-readable line. A run with a time
//! limit prints the JSON snapshot of every container instead, even if the
//! starting order happened to recur before the limit.

use ballclock_core::runner::SimulationResult;

/// Render `result` for printing.
///
/// `limited` is whether the run was started with a nonzero time limit.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the snapshot cannot be serialized.
pub fn render(result: &SimulationResult, limited: bool) -> Result<String, serde_json::Error> {
    if limited {
        serde_json::to_string(&result.snapshot)
    } else {
        Ok(format!(
            "{} balls cycle after {} days",
            result.ball_count,
            result.elapsed_days()
        ))
    }
}
