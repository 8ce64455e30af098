//! Shared type definitions for the ball clock simulation.
//!
//! This crate is the single source of truth for the value types that flow
//! between the simulation core and the command-line driver.
//!
//! # Modules
//!
//! - [`ball`] -- The [`Ball`] identifier and clock-wide time constants
//! - [`level`] -- The three holding track levels and their capacities
//! - [`snapshot`] -- Serializable view of every container at one instant

pub mod ball;
pub mod level;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use ball::{Ball, MINUTES_PER_DAY, MINUTES_PER_HOUR};
pub use level::TrackLevel;
pub use snapshot::ClockSnapshot;
