//! CPU occupancy timeline.
//!
//! Run-length-encoded, append-only log of which process (or IDLE) held the
//! CPU during each tick interval. Appending one unit for the same occupant
//! extends the last slice; a different occupant starts a new slice, so no
//! two adjacent slices ever share an occupant.

use serde::{Deserialize, Serialize};

use super::process::{ProcessId, Tick};

/// Who held the CPU during a slice. IDLE is a first-class occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Occupant {
    /// No eligible process; the CPU ticked idle.
    Idle,
    /// The identified process executed.
    Process(ProcessId),
}

impl Occupant {
    /// Whether this occupant is the given process.
    pub fn is_process(&self, id: &str) -> bool {
        matches!(self, Occupant::Process(p) if p == id)
    }
}

// Wire shape: the process id string, or the literal "IDLE".
impl From<Occupant> for String {
    fn from(o: Occupant) -> Self {
        match o {
            Occupant::Idle => "IDLE".to_string(),
            Occupant::Process(id) => id,
        }
    }
}

impl From<String> for Occupant {
    fn from(s: String) -> Self {
        if s == "IDLE" {
            Occupant::Idle
        } else {
            Occupant::Process(s)
        }
    }
}

impl std::fmt::Display for Occupant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occupant::Idle => f.write_str("IDLE"),
            Occupant::Process(id) => f.write_str(id),
        }
    }
}

/// A maximal run of consecutive ticks with the same occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSlice {
    /// Process id or IDLE.
    pub occupant: Occupant,
    /// First covered tick.
    pub start: Tick,
    /// One past the last covered tick.
    pub end: Tick,
}

impl TimelineSlice {
    /// Number of ticks covered.
    #[inline]
    pub fn len(&self) -> Tick {
        self.end - self.start
    }

    /// Whether the slice covers no ticks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Run-length-encoded CPU occupancy log.
///
/// Slices are contiguous and gapless over `[0, span())`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    slices: Vec<TimelineSlice>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one tick of occupancy at time `t`.
    ///
    /// Extends the last slice when the occupant matches and `end == t`,
    /// otherwise starts a new slice `[t, t+1)`.
    pub fn record_unit(&mut self, occupant: Occupant, t: Tick) {
        if let Some(last) = self.slices.last_mut() {
            if last.occupant == occupant && last.end == t {
                last.end += 1;
                return;
            }
        }
        self.slices.push(TimelineSlice {
            occupant,
            start: t,
            end: t + 1,
        });
    }

    /// All slices in chronological order.
    pub fn slices(&self) -> &[TimelineSlice] {
        &self.slices
    }

    /// Total ticks covered: the end of the last slice, or 0.
    pub fn span(&self) -> Tick {
        self.slices.last().map_or(0, |s| s.end)
    }

    /// Number of slices.
    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Ticks spent executing processes (non-IDLE).
    pub fn busy_ticks(&self) -> Tick {
        self.slices
            .iter()
            .filter(|s| s.occupant != Occupant::Idle)
            .map(TimelineSlice::len)
            .sum()
    }

    /// Discards all slices. Used by reset only.
    pub fn clear(&mut self) {
        self.slices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> Occupant {
        Occupant::Process(s.to_string())
    }

    #[test]
    fn test_record_merges_same_occupant() {
        let mut tl = Timeline::new();
        tl.record_unit(pid("a"), 0);
        tl.record_unit(pid("a"), 1);
        tl.record_unit(pid("a"), 2);
        assert_eq!(tl.slice_count(), 1);
        assert_eq!(tl.slices()[0].start, 0);
        assert_eq!(tl.slices()[0].end, 3);
        assert_eq!(tl.span(), 3);
    }

    #[test]
    fn test_record_splits_on_occupant_change() {
        let mut tl = Timeline::new();
        tl.record_unit(pid("a"), 0);
        tl.record_unit(pid("b"), 1);
        tl.record_unit(pid("a"), 2);
        assert_eq!(tl.slice_count(), 3);
        // Gapless and no adjacent duplicates
        for w in tl.slices().windows(2) {
            assert_eq!(w[0].end, w[1].start);
            assert_ne!(w[0].occupant, w[1].occupant);
        }
    }

    #[test]
    fn test_idle_is_first_class() {
        let mut tl = Timeline::new();
        tl.record_unit(Occupant::Idle, 0);
        tl.record_unit(Occupant::Idle, 1);
        tl.record_unit(pid("a"), 2);
        assert_eq!(tl.slice_count(), 2);
        assert_eq!(tl.slices()[0].occupant, Occupant::Idle);
        assert_eq!(tl.slices()[0].len(), 2);
        assert_eq!(tl.busy_ticks(), 1);
    }

    #[test]
    fn test_clear() {
        let mut tl = Timeline::new();
        tl.record_unit(pid("a"), 0);
        tl.clear();
        assert!(tl.is_empty());
        assert_eq!(tl.span(), 0);
    }

    #[test]
    fn test_occupant_wire_shape() {
        let slice = TimelineSlice {
            occupant: Occupant::Idle,
            start: 0,
            end: 2,
        };
        let json = serde_json::to_string(&slice).unwrap();
        assert!(json.contains("\"IDLE\""));

        let back: TimelineSlice = serde_json::from_str(&json).unwrap();
        assert_eq!(back.occupant, Occupant::Idle);

        let json = serde_json::to_string(&pid("abc1234")).unwrap();
        assert_eq!(json, "\"abc1234\"");
    }
}
