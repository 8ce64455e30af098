//! Tick engine and orchestration for the ball clock simulation.
//!
//! A fixed set of numbered balls circulates through a main queue and three
//! capacity-limited tracks, one simulated minute at a time. The crate
//! answers how many simulated days pass before the main queue returns to
//! its starting order.
//!
//! # Modules
//!
//! - [`container`] -- Lock-guarded bounded FIFO queue and LIFO stack.
//! - [`track`] -- A holding track and its overflow cascade.
//! - [`mechanism`] -- The assembled clock: queue, tracks, origin snapshot.
//! - [`engine`] -- [`SimulationEngine`], the sequential tick state machine.
//! - [`runner`] -- Run loop, [`TickCallback`] hook, and run results.
//! - [`pipeline`] -- The same clock driven by one task per track level.
//! - [`config`] -- Configuration loading from YAML into typed structs.
//!
//! [`SimulationEngine`]: engine::SimulationEngine
//! [`TickCallback`]: runner::TickCallback

pub mod config;
pub mod container;
pub mod engine;
pub mod mechanism;
pub mod pipeline;
pub mod runner;
pub mod track;
