//! The clock driven by one task per stage.
//!
//! Four Tokio tasks run concurrently: a dispatcher that releases balls
//! from the main queue, and one handler per track level. They talk only
//! through bounded handoff channels that carry one ball each, plus two
//! signals:
//!
//! - **proceed** -- sent by whichever handler finished with the current
//!   ball; the dispatcher waits for it before releasing the next one.
//! - **finished** -- sent by the dispatcher when the run limit is reached,
//!   by the hour handler when the starting order recurs, or by any task
//!   that fails. The first message ends the run.
//!
//! Because the dispatcher never releases a ball before the previous one
//! has settled, at most one ball is in flight and the per-container locks
//! are sufficient. Results are identical to [`SimulationEngine`].
//!
//! [`SimulationEngine`]: crate::engine::SimulationEngine

use std::num::NonZeroU64;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ballclock_types::{Ball, TrackLevel};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info};

use crate::config::{ClockConfig, ConfigError};
use crate::container::ContainerError;
use crate::mechanism::ClockMechanism;
use crate::runner::{SimulationEndReason, SimulationResult};
use crate::track::TrackOutcome;

/// Capacity of the finished channel; one slot per task.
const FINISHED_SLOTS: usize = 4;

/// Errors that can occur while running the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The configuration was rejected before any task started.
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

    /// A stage's channel closed while the run was still in progress.
    #[error("{stage} channel closed unexpectedly")]
    ChannelClosed {
        /// The channel that closed.
        stage: &'static str,
    },

    /// Every task exited without reporting an outcome.
    #[error("pipeline stopped without a result")]
    Stalled,
}

/// State shared by every task of one run.
#[derive(Debug)]
struct Shared {
    mechanism: ClockMechanism,
    elapsed_minutes: AtomicU64,
}

type Finished = Result<SimulationEndReason, PipelineError>;

/// Run the clock as a dispatcher task plus one task per track.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] for an out-of-range ball count, or
/// the first error reported by any task.
pub async fn run_pipeline(config: &ClockConfig) -> Result<SimulationResult, PipelineError> {
    let shared = Arc::new(Shared {
        mechanism: ClockMechanism::new(config)?,
        elapsed_minutes: AtomicU64::new(0),
    });

    let (minute_tx, minute_rx) = mpsc::channel::<Ball>(1);
    let (five_minute_tx, five_minute_rx) = mpsc::channel::<Ball>(1);
    let (hour_tx, hour_rx) = mpsc::channel::<Ball>(1);
    let (proceed_tx, proceed_rx) = mpsc::channel::<()>(1);
    let (finished_tx, mut finished_rx) = mpsc::channel::<Finished>(FINISHED_SLOTS);

    info!(
        ball_count = config.ball_count,
        run_minutes = config.run_minutes,
        "Pipeline starting"
    );

    let handles = vec![
        tokio::spawn(dispatcher(
            Arc::clone(&shared),
            minute_tx,
            proceed_rx,
            finished_tx.clone(),
            config.run_limit(),
        )),
        tokio::spawn(track_handler(
            Arc::clone(&shared),
            TrackLevel::Minute,
            minute_rx,
            Some(five_minute_tx),
            proceed_tx.clone(),
            finished_tx.clone(),
        )),
        tokio::spawn(track_handler(
            Arc::clone(&shared),
            TrackLevel::FiveMinute,
            five_minute_rx,
            Some(hour_tx),
            proceed_tx.clone(),
            finished_tx.clone(),
        )),
        tokio::spawn(track_handler(
            Arc::clone(&shared),
            TrackLevel::Hour,
            hour_rx,
            None,
            proceed_tx,
            finished_tx,
        )),
    ];

    let finished = finished_rx.recv().await;

    for handle in &handles {
        handle.abort();
    }
    for handle in handles {
        // Cancellation is the expected outcome for the tasks still waiting.
        let _ = handle.await;
    }

    let end_reason = finished.ok_or(PipelineError::Stalled)??;
    let elapsed_minutes = shared.elapsed_minutes.load(Ordering::Acquire);
    debug!(?end_reason, elapsed_minutes, "Pipeline finished");

    Ok(SimulationResult {
        end_reason,
        ball_count: shared.mechanism.ball_count(),
        elapsed_minutes,
        snapshot: shared.mechanism.snapshot(),
    })
}

/// Dispatcher task: release one ball per minute and wait for it to settle.
async fn dispatcher(
    shared: Arc<Shared>,
    minute_tx: Sender<Ball>,
    mut proceed_rx: Receiver<()>,
    finished_tx: Sender<Finished>,
    run_limit: Option<NonZeroU64>,
) {
    let outcome = dispatch_loop(&shared, &minute_tx, &mut proceed_rx, run_limit).await;
    let _ = finished_tx.send(outcome).await;
}

async fn dispatch_loop(
    shared: &Shared,
    minute_tx: &Sender<Ball>,
    proceed_rx: &mut Receiver<()>,
    run_limit: Option<NonZeroU64>,
) -> Finished {
    loop {
        match shared.mechanism.release() {
            Ok(ball) => {
                minute_tx
                    .send(ball)
                    .await
                    .map_err(|_err| PipelineError::ChannelClosed { stage: "minute" })?;
                proceed_rx
                    .recv()
                    .await
                    .ok_or(PipelineError::ChannelClosed { stage: "proceed" })?;
            }
            // Nothing to release; the limit is still checked below.
            Err(_empty) => tokio::task::yield_now().await,
        }

        let elapsed = shared.elapsed_minutes.load(Ordering::Acquire);
        if run_limit.is_some_and(|limit| elapsed >= limit.get()) {
            info!(minute = elapsed, "Run limit reached");
            return Ok(SimulationEndReason::TimeLimitReached);
        }
    }
}

/// Track handler task: place each inbound ball on the track at `level`.
async fn track_handler(
    shared: Arc<Shared>,
    level: TrackLevel,
    mut inbound: Receiver<Ball>,
    next: Option<Sender<Ball>>,
    proceed_tx: Sender<()>,
    finished_tx: Sender<Finished>,
) {
    let outcome = track_loop(&shared, level, &mut inbound, next.as_ref(), &proceed_tx).await;
    let _ = finished_tx.send(outcome).await;
}

async fn track_loop(
    shared: &Shared,
    level: TrackLevel,
    inbound: &mut Receiver<Ball>,
    next: Option<&Sender<Ball>>,
    proceed_tx: &Sender<()>,
) -> Finished {
    while let Some(ball) = inbound.recv().await {
        if level == TrackLevel::Minute {
            shared.elapsed_minutes.fetch_add(1, Ordering::AcqRel);
        }

        let outcome = shared
            .mechanism
            .track(level)
            .accept(ball, shared.mechanism.queue())
            .map_err(|source| PipelineError::QueueRejected { level, source })?;

        match outcome {
            TrackOutcome::Accepted => {}
            TrackOutcome::Forward { carry, to } => {
                next.ok_or_else(|| PipelineError::ChannelClosed { stage: to.name() })?
                    .send(carry)
                    .await
                    .map_err(|_err| PipelineError::ChannelClosed { stage: to.name() })?;
                continue;
            }
            TrackOutcome::Returned { .. } => {
                if shared.mechanism.matches_origin() {
                    let minute = shared.elapsed_minutes.load(Ordering::Acquire);
                    info!(minute, "Starting order recurred");
                    return Ok(SimulationEndReason::CycleDetected);
                }
            }
        }

        proceed_tx
            .send(())
            .await
            .map_err(|_err| PipelineError::ChannelClosed { stage: "proceed" })?;
    }
    Err(PipelineError::ChannelClosed { stage: level.name() })
}
