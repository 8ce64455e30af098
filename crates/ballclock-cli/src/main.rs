//! Command-line driver for the ball clock simulation.
//!
//! Loads the clock configuration, runs the simulation, and prints either
//! the number of days until the starting order recurs or, for a
//! time-limited run, a JSON snapshot of every container.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load the optional YAML configuration and apply flag overrides
//! 3. Initialize structured logging (tracing, to stderr)
//! 4. Validate the ball count
//! 5. Run the sequential engine or the task pipeline
//! 6. Print the result to stdout
//!
//! # Example
//!
//! ```bash
//! ballclock --ball-count 30
//! ballclock --ball-count 30 --run-time 325
//! RUST_LOG=debug ballclock --config ballclock.yaml --pipeline
//! ```

mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use ballclock_core::config::{BallClockConfig, MAX_BALLS, MIN_BALLS};
use ballclock_core::engine::SimulationEngine;
use ballclock_core::pipeline;
use ballclock_core::runner::{self, ProgressCallback};
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Ball clock simulator
///
/// Counts the days a ball clock runs before its main queue returns to the
/// starting order.
#[derive(Parser, Debug)]
#[command(name = "ballclock")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of balls in the ball queue. Valid values are between 27 and 127
    #[arg(long, visible_alias = "ballCount")]
    ball_count: Option<u16>,

    /// The number of minutes to run the clock (0 runs until the starting order recurs)
    #[arg(long, visible_alias = "runTime")]
    run_time: Option<u64>,

    /// YAML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drive the clock with one task per track instead of a single loop
    #[arg(long)]
    pipeline: bool,
}

/// Application entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) if err.is_usage_error() => {
            eprintln!("ERROR: ballCount must be between {MIN_BALLS} and {MAX_BALLS}");
            eprintln!("{}", Args::command().render_help());
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Load configuration, run the simulation, and render the report.
async fn run(args: &Args) -> Result<String, CliError> {
    let mut config = match &args.config {
        Some(path) => BallClockConfig::from_file(path)?,
        None => BallClockConfig::default(),
    };
    if let Some(ball_count) = args.ball_count {
        config.clock.ball_count = ball_count;
    }
    if let Some(run_time) = args.run_time {
        config.clock.run_minutes = run_time;
    }

    init_tracing(&config.logging.level);

    config.clock.validate()?;
    info!(
        ball_count = config.clock.ball_count,
        run_minutes = config.clock.run_minutes,
        pipeline = args.pipeline,
        "Configuration loaded"
    );

    let result = if args.pipeline {
        pipeline::run_pipeline(&config.clock).await?
    } else {
        let mut engine = SimulationEngine::new(&config.clock)?;
        runner::run_simulation(&mut engine, &mut ProgressCallback::default())?
    };
    runner::log_simulation_end(&result);

    Ok(output::render(&result, config.clock.run_limit().is_some())?)
}

/// Initialize structured logging on stderr; `RUST_LOG` overrides `level`.
fn init_tracing(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
