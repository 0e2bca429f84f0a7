//! CPU process scheduling simulator.
//!
//! Simulates process scheduling under three classic disciplines — FCFS,
//! non-preemptive SJF, and Round Robin — over synthetic, single-burst,
//! CPU-only processes advancing in discrete integer ticks. Built for
//! teaching and visualization: front ends consume the engine only through
//! immutable state snapshots and the operation surface on [`Simulator`].
//!
//! # Modules
//!
//! - **`models`**: Domain types — `ProcessSpec`, `ProcessRecord`,
//!   `Timeline`, `Occupant`, `Algorithm`, `SimConfig`
//! - **`engine`**: The scheduling state machine, driving timer, and
//!   snapshot publisher
//! - **`metrics`**: Turnaround/waiting/response/efficiency derivation
//! - **`validation`**: Input integrity checks (duplicate IDs, empty names,
//!   zero bursts)
//!
//! # Architecture
//!
//! The engine exclusively owns its process records, timeline, and ready
//! queue; a periodic timer invokes one `step()` per wall-clock interval,
//! and every mutation publishes a deep-copied [`Snapshot`] to subscribers.
//! The wall-clock interval controls pacing only, never the simulated
//! semantics.
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2015), "Modern Operating Systems", Ch. 2.4

pub mod engine;
pub mod metrics;
pub mod models;
pub mod validation;

pub use engine::{Simulator, Snapshot, SubscriberId, Subscription};
pub use metrics::{compute_results, MetricAverages, MetricsRow, SimResults};
pub use models::{
    Algorithm, Occupant, ProcessId, ProcessRecord, ProcessSpec, SimConfig, Tick, Timeline,
    TimelineSlice,
};
pub use validation::{validate_specs, ValidationError, ValidationErrorKind};
