//! Process model.
//!
//! A process is a synthetic, single-burst, CPU-only unit of work. The
//! immutable input specification ([`ProcessSpec`]) is kept separate from the
//! simulator-owned derived state ([`ProcessRecord`]) so that a reset can
//! always rebuild the derived fields from the originals.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One discrete unit of simulated CPU time.
pub type Tick = u64;

/// Unique process identifier.
pub type ProcessId = String;

/// Length of generated process identifiers.
const ID_LEN: usize = 7;

/// An input process specification.
///
/// Immutable after arrival: the simulator clones specs at initialization and
/// never mutates the originals. An absent `id` is assigned once, at
/// initialization, and stays stable across resets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Unique identifier. `None` = assigned at initialization.
    pub id: Option<ProcessId>,
    /// Human-readable display name.
    pub name: String,
    /// Arrival time (tick at which the process becomes eligible).
    pub arrival: Tick,
    /// Total CPU ticks required.
    pub burst: Tick,
}

impl ProcessSpec {
    /// Creates a new spec without an explicit id.
    pub fn new(name: impl Into<String>, arrival: Tick, burst: Tick) -> Self {
        Self {
            id: None,
            name: name.into(),
            arrival,
            burst,
        }
    }

    /// Sets an explicit identifier.
    pub fn with_id(mut self, id: impl Into<ProcessId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Simulator-owned derived state for one process.
///
/// # Invariants
/// - `remaining == burst - executed`, non-increasing over a run.
/// - `first_start` is set at most once.
/// - `completion` is set iff `remaining == 0` and never changes thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Unique identifier.
    pub id: ProcessId,
    /// Human-readable display name.
    pub name: String,
    /// Arrival tick.
    pub arrival: Tick,
    /// Total CPU ticks required.
    pub burst: Tick,
    /// CPU ticks left.
    pub remaining: Tick,
    /// CPU ticks completed.
    pub executed: Tick,
    /// Tick of first dispatch. `None` = never dispatched.
    pub first_start: Option<Tick>,
    /// Tick at which the last unit finished (exclusive end). `None` = running.
    pub completion: Option<Tick>,
}

impl ProcessRecord {
    /// Builds a fresh record from a resolved spec.
    ///
    /// The spec's id must already be assigned; an unresolved spec yields an
    /// empty id (the caller is responsible for id assignment).
    pub fn from_spec(spec: &ProcessSpec) -> Self {
        Self {
            id: spec.id.clone().unwrap_or_default(),
            name: spec.name.clone(),
            arrival: spec.arrival,
            burst: spec.burst,
            remaining: spec.burst,
            executed: 0,
            first_start: None,
            completion: None,
        }
    }

    /// Whether the process has consumed its entire burst.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Whether the process is eligible to run at tick `t`.
    #[inline]
    pub fn is_ready_at(&self, t: Tick) -> bool {
        self.arrival <= t && self.remaining > 0
    }
}

/// Generates a random 7-character lowercase base-36 identifier.
pub fn generate_id<R: Rng>(rng: &mut R) -> ProcessId {
    (0..ID_LEN)
        .map(|_| {
            let d = rng.random_range(0..36);
            char::from_digit(d, 36).unwrap_or('0')
        })
        .collect()
}

/// Clones `specs`, assigning a generated id to every spec without one.
///
/// Explicit ids are preserved verbatim. Called once at initialization; the
/// resolved specs are what resets rebuild from, so ids stay stable.
pub fn resolve_ids<R: Rng>(specs: &[ProcessSpec], rng: &mut R) -> Vec<ProcessSpec> {
    specs
        .iter()
        .map(|s| {
            let mut spec = s.clone();
            if spec.id.is_none() {
                spec.id = Some(generate_id(rng));
            }
            spec
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_spec_builder() {
        let spec = ProcessSpec::new("P1", 3, 5).with_id("p-1");
        assert_eq!(spec.id.as_deref(), Some("p-1"));
        assert_eq!(spec.name, "P1");
        assert_eq!(spec.arrival, 3);
        assert_eq!(spec.burst, 5);
    }

    #[test]
    fn test_record_from_spec() {
        let spec = ProcessSpec::new("P1", 2, 4).with_id("p-1");
        let rec = ProcessRecord::from_spec(&spec);
        assert_eq!(rec.id, "p-1");
        assert_eq!(rec.remaining, 4);
        assert_eq!(rec.executed, 0);
        assert_eq!(rec.first_start, None);
        assert_eq!(rec.completion, None);
        assert!(!rec.is_complete());
    }

    #[test]
    fn test_record_readiness() {
        let rec = ProcessRecord::from_spec(&ProcessSpec::new("P1", 2, 1).with_id("p"));
        assert!(!rec.is_ready_at(0));
        assert!(!rec.is_ready_at(1));
        assert!(rec.is_ready_at(2));
        assert!(rec.is_ready_at(10));

        let mut done = rec;
        done.remaining = 0;
        assert!(!done.is_ready_at(10));
        assert!(done.is_complete());
    }

    #[test]
    fn test_generate_id_shape() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..100 {
            let id = generate_id(&mut rng);
            assert_eq!(id.len(), 7);
            assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_resolve_ids_assigns_missing_only() {
        let mut rng = SmallRng::seed_from_u64(7);
        let specs = vec![
            ProcessSpec::new("A", 0, 1).with_id("fixed"),
            ProcessSpec::new("B", 0, 1),
        ];
        let resolved = resolve_ids(&specs, &mut rng);
        assert_eq!(resolved[0].id.as_deref(), Some("fixed"));
        assert!(resolved[1].id.is_some());
        assert_eq!(resolved[1].id.as_ref().unwrap().len(), 7);
        // Originals untouched
        assert!(specs[1].id.is_none());
    }
}
