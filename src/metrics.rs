//! Performance metrics.
//!
//! Pure derivation of per-process and aggregate scheduling metrics from the
//! current process records. Valid mid-run: metrics of a process that has not
//! completed (or never started) are simply undefined.
//!
//! # Metrics
//!
//! | Metric | Definition | Defined when |
//! |--------|-----------|--------------|
//! | Turnaround | completion − arrival | completed |
//! | Waiting | turnaround − burst | completed |
//! | Response | first start − arrival | first dispatch happened |
//! | Efficiency | burst ÷ turnaround, 3 decimals | turnaround > 0 |
//!
//! Averages are computed over *all* processes, substituting 0 for any
//! undefined metric in the numerator while dividing by the full process
//! count. That is deliberately lenient reference behavior, kept as-is; it
//! deflates averages while any process is incomplete.

use serde::{Deserialize, Serialize};

use crate::models::{ProcessId, ProcessRecord, Tick};

/// Per-process metrics row.
///
/// Carries the record fields alongside the derived metrics so a consumer
/// can render a results table from rows alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    /// Process identifier.
    pub id: ProcessId,
    /// Display name.
    pub name: String,
    /// Arrival tick.
    pub arrival: Tick,
    /// Total burst.
    pub burst: Tick,
    /// Tick of first dispatch, if any.
    pub first_start: Option<Tick>,
    /// Completion tick, if completed.
    pub completion: Option<Tick>,
    /// completion − arrival.
    pub turnaround: Option<Tick>,
    /// turnaround − burst.
    pub waiting: Option<Tick>,
    /// first_start − arrival.
    pub response: Option<Tick>,
    /// burst ÷ turnaround, rounded to 3 decimals.
    pub efficiency: Option<f64>,
}

/// Averages across all processes (undefined metrics counted as 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricAverages {
    /// Mean turnaround.
    pub turnaround: f64,
    /// Mean waiting time.
    pub waiting: f64,
    /// Mean response time.
    pub response: f64,
    /// Mean efficiency.
    pub efficiency: f64,
}

/// Derived results: per-process rows, averages, and the best performer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimResults {
    /// One row per process, in input order.
    pub rows: Vec<MetricsRow>,
    /// Aggregate averages.
    pub averages: MetricAverages,
    /// Id of the process with the highest defined efficiency, ties broken
    /// by first occurrence in input order. `None` if nothing completed.
    pub best: Option<ProcessId>,
}

/// Rounds to 3 decimal places.
fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Average with undefined entries substituted as 0; empty input yields 0.
fn lenient_avg<I: Iterator<Item = Option<f64>>>(values: I) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v.unwrap_or(0.0);
        count += 1;
    }
    round3(sum / count.max(1) as f64)
}

/// Computes metrics for the given records.
pub fn compute_results(records: &[ProcessRecord]) -> SimResults {
    let rows: Vec<MetricsRow> = records
        .iter()
        .map(|p| {
            let turnaround = p.completion.map(|c| c - p.arrival);
            let waiting = turnaround.map(|t| t - p.burst);
            let response = p.first_start.map(|f| f - p.arrival);
            let efficiency = turnaround
                .filter(|&t| t > 0)
                .map(|t| round3(p.burst as f64 / t as f64));
            MetricsRow {
                id: p.id.clone(),
                name: p.name.clone(),
                arrival: p.arrival,
                burst: p.burst,
                first_start: p.first_start,
                completion: p.completion,
                turnaround,
                waiting,
                response,
                efficiency,
            }
        })
        .collect();

    // Strict greater-than keeps the first of any ties.
    let mut best: Option<ProcessId> = None;
    let mut best_score = -1.0f64;
    for row in &rows {
        if let Some(e) = row.efficiency {
            if e > best_score {
                best_score = e;
                best = Some(row.id.clone());
            }
        }
    }

    let averages = MetricAverages {
        turnaround: lenient_avg(rows.iter().map(|r| r.turnaround.map(|v| v as f64))),
        waiting: lenient_avg(rows.iter().map(|r| r.waiting.map(|v| v as f64))),
        response: lenient_avg(rows.iter().map(|r| r.response.map(|v| v as f64))),
        efficiency: lenient_avg(rows.iter().map(|r| r.efficiency)),
    };

    SimResults {
        rows,
        averages,
        best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessSpec;

    fn record(
        id: &str,
        arrival: Tick,
        burst: Tick,
        first_start: Option<Tick>,
        completion: Option<Tick>,
    ) -> ProcessRecord {
        let mut r = ProcessRecord::from_spec(&ProcessSpec::new(id, arrival, burst).with_id(id));
        r.first_start = first_start;
        r.completion = completion;
        if completion.is_some() {
            r.remaining = 0;
            r.executed = burst;
        }
        r
    }

    #[test]
    fn test_completed_process_metrics() {
        // Arrived at 1, started at 3, burst 2, done at 5.
        let results = compute_results(&[record("a", 1, 2, Some(3), Some(5))]);
        let row = &results.rows[0];
        assert_eq!(row.turnaround, Some(4));
        assert_eq!(row.waiting, Some(2));
        assert_eq!(row.response, Some(2));
        assert_eq!(row.efficiency, Some(0.5));
        assert_eq!(results.best.as_deref(), Some("a"));
    }

    #[test]
    fn test_incomplete_process_undefined() {
        let results = compute_results(&[record("a", 0, 5, Some(0), None)]);
        let row = &results.rows[0];
        assert_eq!(row.turnaround, None);
        assert_eq!(row.waiting, None);
        assert_eq!(row.response, Some(0));
        assert_eq!(row.efficiency, None);
        assert_eq!(results.best, None);
    }

    #[test]
    fn test_efficiency_rounding() {
        // burst 1, turnaround 3 → 0.333
        let results = compute_results(&[record("a", 0, 1, Some(2), Some(3))]);
        assert_eq!(results.rows[0].efficiency, Some(0.333));
    }

    #[test]
    fn test_lenient_averages_count_undefined_as_zero() {
        let results = compute_results(&[
            record("a", 0, 2, Some(0), Some(2)), // turnaround 2
            record("b", 0, 4, Some(2), None), // turnaround undefined → 0
        ]);
        // (2 + 0) / 2
        assert!((results.averages.turnaround - 1.0).abs() < 1e-9);
        // a: waiting 0, b undefined → 0/2
        assert!((results.averages.waiting - 0.0).abs() < 1e-9);
        // a: response 0, b: 2 → 1.0
        assert!((results.averages.response - 1.0).abs() < 1e-9);
        // a: efficiency 1.0, b undefined → 0.5
        assert!((results.averages.efficiency - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_best_tie_broken_by_input_order() {
        let results = compute_results(&[
            record("first", 0, 2, Some(0), Some(2)),  // efficiency 1.0
            record("second", 2, 2, Some(2), Some(4)), // efficiency 1.0
        ]);
        assert_eq!(results.best.as_deref(), Some("first"));
    }

    #[test]
    fn test_empty_input() {
        let results = compute_results(&[]);
        assert!(results.rows.is_empty());
        assert_eq!(results.best, None);
        assert_eq!(results.averages.turnaround, 0.0);
        assert_eq!(results.averages.efficiency, 0.0);
    }

    #[test]
    fn test_results_serialize() {
        let results = compute_results(&[record("a", 0, 2, Some(0), Some(2))]);
        let json = serde_json::to_string(&results).unwrap();
        let back: SimResults = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }
}
