//! Simulation configuration.
//!
//! Configuration is validated once at the boundary: quantum and tick
//! interval are clamped to their minimums rather than rejected, and the
//! algorithm is an enumerated type so invalid values are unrepresentable.
//! Invalid algorithm *strings* surface as a parse error the caller ignores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum Round Robin quantum (ticks).
pub const MIN_QUANTUM: u64 = 1;
/// Minimum wall-clock interval between timer-driven steps (ms).
pub const MIN_TICK_INTERVAL_MS: u64 = 250;
/// Default Round Robin quantum.
pub const DEFAULT_QUANTUM: u64 = 2;
/// Default wall-clock tick interval (ms).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 3000;

/// Scheduling discipline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    /// First-Come-First-Served: earliest arrival runs to completion.
    #[default]
    Fcfs,
    /// Shortest-Job-First, non-preemptive: smallest remaining among arrived.
    Sjf,
    /// Round Robin: quantum-bounded slices over an explicit ready queue.
    Rr,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Fcfs => f.write_str("FCFS"),
            Algorithm::Sjf => f.write_str("SJF"),
            Algorithm::Rr => f.write_str("RR"),
        }
    }
}

/// Error for an unrecognized algorithm identifier.
///
/// The engine contract is that invalid identifiers are silently ignored;
/// callers receive this error and simply skip the `set_algorithm` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlgorithmError(pub String);

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scheduling algorithm '{}'", self.0)
    }
}

impl std::error::Error for ParseAlgorithmError {}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FCFS" => Ok(Algorithm::Fcfs),
            "SJF" => Ok(Algorithm::Sjf),
            "RR" => Ok(Algorithm::Rr),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Validated simulation configuration.
///
/// Construction clamps numeric fields to their minimums, so a held
/// `SimConfig` is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Active scheduling discipline.
    pub algorithm: Algorithm,
    /// Round Robin quantum (ticks), ≥ 1. Inert under FCFS/SJF.
    pub quantum: u64,
    /// Wall-clock milliseconds per timer-driven step, ≥ 250.
    pub tick_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            quantum: DEFAULT_QUANTUM,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl SimConfig {
    /// Creates the default configuration (FCFS, quantum 2, 3000 ms ticks).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scheduling discipline.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the quantum, clamped to ≥ 1.
    pub fn with_quantum(mut self, quantum: u64) -> Self {
        self.quantum = quantum.max(MIN_QUANTUM);
        self
    }

    /// Sets the tick interval, clamped to ≥ 250 ms.
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms.max(MIN_TICK_INTERVAL_MS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SimConfig::new();
        assert_eq!(cfg.algorithm, Algorithm::Fcfs);
        assert_eq!(cfg.quantum, 2);
        assert_eq!(cfg.tick_interval_ms, 3000);
    }

    #[test]
    fn test_clamping() {
        let cfg = SimConfig::new().with_quantum(0).with_tick_interval_ms(10);
        assert_eq!(cfg.quantum, 1);
        assert_eq!(cfg.tick_interval_ms, 250);

        let cfg = SimConfig::new().with_quantum(5).with_tick_interval_ms(500);
        assert_eq!(cfg.quantum, 5);
        assert_eq!(cfg.tick_interval_ms, 500);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("FCFS".parse::<Algorithm>().unwrap(), Algorithm::Fcfs);
        assert_eq!("sjf".parse::<Algorithm>().unwrap(), Algorithm::Sjf);
        assert_eq!("Rr".parse::<Algorithm>().unwrap(), Algorithm::Rr);
        assert!("priority".parse::<Algorithm>().is_err());
        assert!("".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_algorithm_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Algorithm::Fcfs).unwrap(), "\"FCFS\"");
        assert_eq!(serde_json::to_string(&Algorithm::Rr).unwrap(), "\"RR\"");
        let a: Algorithm = serde_json::from_str("\"SJF\"").unwrap();
        assert_eq!(a, Algorithm::Sjf);
    }
}
