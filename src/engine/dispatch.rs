//! Per-tick dispatch decisions.
//!
//! Pure selection logic over process records: ready-set ordering, FCFS and
//! SJF candidate picks, and Round Robin queue admission. The mutation of
//! records and timeline stays in the engine core; everything here is
//! independently testable.

use std::collections::VecDeque;

use crate::models::{ProcessId, ProcessRecord, Tick};

/// Indices of the processes eligible at tick `t`, sorted by arrival
/// ascending (stable), with the current process moved to the front when it
/// is still eligible. The move affects tie-breaking only.
pub(crate) fn ready_order(
    records: &[ProcessRecord],
    t: Tick,
    current: Option<&str>,
) -> Vec<usize> {
    let mut ready: Vec<usize> = (0..records.len())
        .filter(|&i| records[i].is_ready_at(t))
        .collect();
    ready.sort_by_key(|&i| records[i].arrival);

    if let Some(cur) = current {
        if let Some(pos) = ready.iter().position(|&i| records[i].id == cur) {
            let idx = ready.remove(pos);
            ready.insert(0, idx);
        }
    }
    ready
}

/// FCFS: the head of the ready ordering.
pub(crate) fn pick_fcfs(ready: &[usize]) -> Option<usize> {
    ready.first().copied()
}

/// SJF: smallest remaining burst; the first in ready order wins ties.
pub(crate) fn pick_sjf(records: &[ProcessRecord], ready: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &i in ready {
        match best {
            Some(b) if records[i].remaining >= records[b].remaining => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Round Robin admission: appends newly arrived eligible processes (not the
/// current one, not already queued) to the queue tail, preserving the ready
/// ordering among simultaneous entrants.
pub(crate) fn admit_arrivals(
    queue: &mut VecDeque<ProcessId>,
    records: &[ProcessRecord],
    ready: &[usize],
    current: Option<&str>,
) {
    for &i in ready {
        let p = &records[i];
        if Some(p.id.as_str()) == current {
            continue;
        }
        if p.remaining > 0 && !queue.contains(&p.id) {
            queue.push_back(p.id.clone());
        }
    }
}
