//! Simulation domain models.
//!
//! Provides the core data types for the scheduling engine: process
//! specifications and records, the run-length-encoded CPU timeline, and
//! the validated simulation configuration.
//!
//! All times are discrete integer ticks; the wall-clock tick interval in
//! [`SimConfig`] only controls how often the driving timer steps the
//! engine, never the simulated semantics.

mod config;
mod process;
mod timeline;

pub use config::{
    Algorithm, ParseAlgorithmError, SimConfig, DEFAULT_QUANTUM, DEFAULT_TICK_INTERVAL_MS,
    MIN_QUANTUM, MIN_TICK_INTERVAL_MS,
};
pub use process::{generate_id, resolve_ids, ProcessId, ProcessRecord, ProcessSpec, Tick};
pub use timeline::{Occupant, Timeline, TimelineSlice};
