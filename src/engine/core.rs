//! Scheduling state machine.
//!
//! `EngineCore` owns all mutable simulation state and advances it one tick
//! per `step()` call. It knows nothing about timers, threads, or
//! subscribers; the `Simulator` handle layers those on top.
//!
//! Two quirks of the reference behavior are reproduced deliberately, not
//! corrected (flagged in DESIGN.md for product-level clarification):
//! - an idle tick under Round Robin still decrements the quantum counter;
//! - the counter is signed so those decrements may drive it negative.

use std::collections::VecDeque;

use log::{debug, trace};
use rand::Rng;

use crate::models::{
    resolve_ids, Algorithm, Occupant, ProcessId, ProcessRecord, ProcessSpec, SimConfig, Tick,
    Timeline, MIN_QUANTUM, MIN_TICK_INTERVAL_MS,
};

/// The per-tick scheduling state machine.
///
/// Exclusively owns its process records, timeline, and ready queue; callers
/// only ever see snapshot copies taken by the surrounding `Simulator`.
#[derive(Debug, Clone)]
pub struct EngineCore {
    /// Input specs with ids resolved. Never mutated after construction.
    specs: Vec<ProcessSpec>,
    config: SimConfig,
    time: Tick,
    timeline: Timeline,
    /// Round Robin ready queue. Unused under FCFS/SJF.
    queue: VecDeque<ProcessId>,
    /// Process that ran during the previous tick, if any.
    current: Option<ProcessId>,
    /// Ticks left in the running process's quantum. Signed: idle ticks under
    /// Round Robin decrement it and may take it below zero.
    quantum_left: i64,
    finished: bool,
    records: Vec<ProcessRecord>,
}

impl EngineCore {
    /// Creates a core from input specs and a validated configuration,
    /// assigning ids to specs without one.
    pub fn new<R: Rng>(specs: &[ProcessSpec], config: SimConfig, rng: &mut R) -> Self {
        // Fields are public, so re-clamp here even when the builder was bypassed.
        let config = SimConfig::new()
            .with_algorithm(config.algorithm)
            .with_quantum(config.quantum)
            .with_tick_interval_ms(config.tick_interval_ms);
        let specs = resolve_ids(specs, rng);
        let mut core = Self {
            specs,
            config,
            time: 0,
            timeline: Timeline::new(),
            queue: VecDeque::new(),
            current: None,
            quantum_left: config.quantum as i64,
            finished: false,
            records: Vec::new(),
        };
        core.reset(true);
        core
    }

    /// Reinitializes all derived state from the resolved specs.
    ///
    /// Clears the timeline and ready queue, rebuilds every record, and sets
    /// time back to 0. When `preserve_algorithm` is false the algorithm
    /// reverts to the default (FCFS).
    pub fn reset(&mut self, preserve_algorithm: bool) {
        self.time = 0;
        self.timeline.clear();
        self.queue.clear();
        self.current = None;
        self.quantum_left = self.config.quantum as i64;
        self.finished = false;
        self.records = self.specs.iter().map(ProcessRecord::from_spec).collect();
        if !preserve_algorithm {
            self.config.algorithm = Algorithm::default();
        }
        debug!(
            "reset: algorithm={} processes={}",
            self.config.algorithm,
            self.records.len()
        );
    }

    /// Switches the discipline and restarts the simulation from tick 0.
    ///
    /// A change never continues mid-flight; even setting the already-active
    /// algorithm performs a full reset.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.config.algorithm = algorithm;
        self.reset(true);
    }

    /// Sets the quantum (clamped to ≥ 1) and retargets the live counter
    /// immediately, without a reset.
    pub fn set_quantum(&mut self, quantum: u64) {
        let q = quantum.max(MIN_QUANTUM);
        self.config.quantum = q;
        self.quantum_left = q as i64;
    }

    /// Sets the wall-clock tick interval, clamped to ≥ 250 ms.
    pub fn set_tick_interval_ms(&mut self, ms: u64) {
        self.config.tick_interval_ms = ms.max(MIN_TICK_INTERVAL_MS);
    }

    /// Advances simulated time by exactly one unit.
    ///
    /// Returns `true` while the simulation is still live; `false` once every
    /// process has completed (the terminal state, where the caller disarms
    /// the driving timer).
    pub fn step(&mut self) -> bool {
        if self.records.iter().all(ProcessRecord::is_complete) {
            self.finished = true;
            debug!("finished at t={}", self.time);
            return false;
        }

        let ready = super::dispatch::ready_order(&self.records, self.time, self.current.as_deref());
        let next = match self.config.algorithm {
            Algorithm::Fcfs => super::dispatch::pick_fcfs(&ready),
            Algorithm::Sjf => self.pick_sjf_nonpreemptive(&ready),
            Algorithm::Rr => self.pick_rr(&ready),
        };

        let Some(idx) = next else {
            // CPU idle this tick.
            trace!("t={}: idle", self.time);
            self.timeline.record_unit(Occupant::Idle, self.time);
            self.current = None;
            if self.config.algorithm == Algorithm::Rr {
                self.quantum_left -= 1;
            }
            self.time += 1;
            return true;
        };

        let p = &mut self.records[idx];
        if p.first_start.is_none() {
            p.first_start = Some(self.time);
        }
        p.remaining -= 1;
        p.executed += 1;
        let id = p.id.clone();
        let completed = p.remaining == 0;
        if completed {
            p.completion = Some(self.time + 1);
        }
        trace!("t={}: run {} (remaining {})", self.time, id, self.records[idx].remaining);
        self.timeline.record_unit(Occupant::Process(id.clone()), self.time);

        if self.config.algorithm == Algorithm::Rr {
            if completed {
                self.quantum_left = self.config.quantum as i64;
            } else {
                self.quantum_left -= 1;
            }
        }

        self.current = Some(id);
        self.time += 1;
        true
    }

    /// Non-preemptive SJF: a current process with work left keeps the CPU
    /// regardless of newer, shorter arrivals.
    fn pick_sjf_nonpreemptive(&self, ready: &[usize]) -> Option<usize> {
        if let Some(i) = self.current_index() {
            if self.records[i].remaining > 0 {
                return Some(i);
            }
        }
        super::dispatch::pick_sjf(&self.records, ready)
    }

    /// Round Robin: admit arrivals, then context-switch when there is no
    /// current process, the current one just completed, or the quantum is
    /// exhausted.
    fn pick_rr(&mut self, ready: &[usize]) -> Option<usize> {
        super::dispatch::admit_arrivals(
            &mut self.queue,
            &self.records,
            ready,
            self.current.as_deref(),
        );

        let cur = self.current_index();
        let need_switch = match cur {
            None => true,
            Some(i) => self.records[i].remaining == 0 || self.quantum_left <= 0,
        };
        if !need_switch {
            return cur;
        }

        // A preempted process requeues at the tail, after any processes that
        // arrived this same tick.
        if let Some(i) = cur {
            if self.records[i].remaining > 0 && self.quantum_left <= 0 {
                self.queue.push_back(self.records[i].id.clone());
            }
        }
        let next = self
            .queue
            .pop_front()
            .and_then(|id| self.records.iter().position(|p| p.id == id));
        self.quantum_left = self.config.quantum as i64;
        if let Some(i) = next {
            trace!("t={}: switch to {}", self.time, self.records[i].id);
        }
        next
    }

    fn current_index(&self) -> Option<usize> {
        self.current
            .as_deref()
            .and_then(|id| self.records.iter().position(|p| p.id == id))
    }

    /// Current simulated time.
    pub fn time(&self) -> Tick {
        self.time
    }

    /// Active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Whether every process has completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Process records in input order.
    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    /// The occupancy timeline so far.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The Round Robin ready queue (empty under FCFS/SJF).
    pub fn queue(&self) -> &VecDeque<ProcessId> {
        &self.queue
    }

    /// Id of the process that ran during the previous tick.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn quantum_left(&self) -> i64 {
        self.quantum_left
    }
}
