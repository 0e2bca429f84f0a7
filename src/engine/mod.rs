//! Scheduling engine.
//!
//! [`Simulator`] is the public, thread-safe handle over the scheduling
//! state machine. All mutation happens under one lock, so `step()` bodies
//! never overlap; everything externally visible is an independently owned
//! [`Snapshot`] delivered through the subscriber registry.
//!
//! A snapshot is emitted after every step, every setter, every reset, and
//! on pause. `start()` only arms the timer; the running flag first becomes
//! visible in the snapshot of the first timer-driven step.

mod core;
mod dispatch;
mod publisher;
mod timer;

pub use self::core::EngineCore;
pub use self::publisher::{SnapshotPublisher, SubscriberId};

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::metrics::{compute_results, SimResults};
use crate::models::{Algorithm, ProcessId, ProcessRecord, ProcessSpec, SimConfig, Tick, Timeline};
use self::timer::TickTimer;

/// Immutable, independently owned copy of the full engine state.
///
/// The sole externally visible representation of the engine: mutating a
/// delivered snapshot affects neither the engine nor any other subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Active scheduling discipline.
    pub algorithm: Algorithm,
    /// Configured Round Robin quantum.
    pub quantum: u64,
    /// Wall-clock milliseconds per timer-driven step.
    pub tick_interval_ms: u64,
    /// Current simulated time.
    pub time: Tick,
    /// CPU occupancy timeline so far.
    pub timeline: Timeline,
    /// Round Robin ready queue, in dispatch order. Empty under FCFS/SJF.
    pub ready_queue: Vec<ProcessId>,
    /// Process records in input order.
    pub processes: Vec<ProcessRecord>,
    /// Derived per-process and aggregate metrics.
    pub results: SimResults,
    /// Whether the driving timer is armed.
    pub running: bool,
    /// Whether every process has completed.
    pub finished: bool,
}

/// Engine state guarded by the simulator lock.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) core: EngineCore,
    publisher: SnapshotPublisher,
    timer: Option<TickTimer>,
    next_generation: u64,
}

impl Shared {
    /// Generation of the currently armed timer, if any.
    pub(crate) fn armed_generation(&self) -> Option<u64> {
        self.timer.as_ref().map(TickTimer::generation)
    }

    /// Steps the core once, disarms the timer on termination, and emits.
    pub(crate) fn step_and_publish(&mut self) {
        if !self.core.step() {
            self.timer = None;
        }
        self.emit();
    }

    fn emit(&mut self) {
        let snapshot = build_snapshot(&self.core, self.timer.is_some());
        self.publisher.publish(&snapshot);
    }
}

/// Locks the shared state, recovering from a poisoned lock.
pub(crate) fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn build_snapshot(core: &EngineCore, running: bool) -> Snapshot {
    let config = core.config();
    Snapshot {
        algorithm: config.algorithm,
        quantum: config.quantum,
        tick_interval_ms: config.tick_interval_ms,
        time: core.time(),
        timeline: core.timeline().clone(),
        ready_queue: core.queue().iter().cloned().collect(),
        processes: core.records().to_vec(),
        results: compute_results(core.records()),
        running,
        finished: core.is_finished(),
    }
}

/// Thread-safe handle to a scheduling simulation.
///
/// Cloning the handle shares the same engine. Dropping the last handle
/// winds down any armed timer on its next wakeup.
///
/// # Example
///
/// ```
/// use procsim::{Algorithm, ProcessSpec, SimConfig, Simulator};
///
/// let sim = Simulator::new(
///     &[
///         ProcessSpec::new("A", 0, 3),
///         ProcessSpec::new("B", 1, 2),
///     ],
///     SimConfig::new().with_algorithm(Algorithm::Fcfs),
/// );
/// while !sim.snapshot().finished {
///     sim.step();
/// }
/// assert_eq!(sim.snapshot().time, 5);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    shared: Arc<Mutex<Shared>>,
}

impl Simulator {
    /// Creates a simulator from input specs and a validated configuration.
    ///
    /// Specs are cloned; ids are assigned where absent and stay stable
    /// across resets. Emits the initial snapshot.
    pub fn new(specs: &[ProcessSpec], config: SimConfig) -> Self {
        let mut rng = rand::rng();
        let core = EngineCore::new(specs, config, &mut rng);
        let shared = Arc::new(Mutex::new(Shared {
            core,
            publisher: SnapshotPublisher::new(),
            timer: None,
            next_generation: 0,
        }));
        lock(&shared).emit();
        Self { shared }
    }

    /// Arms the periodic timer. No-op when finished or already running.
    pub fn start(&self) {
        let mut guard = lock(&self.shared);
        if guard.core.is_finished() || guard.timer.is_some() {
            return;
        }
        let interval = Duration::from_millis(guard.core.config().tick_interval_ms);
        guard.timer = Some(self.arm(&mut guard, interval));
        debug!("started ({} ms ticks)", interval.as_millis());
    }

    /// Disarms the timer, preserving all progress. Idempotent; always emits
    /// a snapshot with `running == false`.
    pub fn pause(&self) {
        let mut guard = lock(&self.shared);
        guard.timer = None;
        guard.emit();
    }

    /// Disarms the timer and reinitializes all derived state. When
    /// `preserve_algorithm` is false the algorithm reverts to FCFS.
    pub fn reset(&self, preserve_algorithm: bool) {
        let mut guard = lock(&self.shared);
        guard.timer = None;
        guard.core.reset(preserve_algorithm);
        guard.emit();
    }

    /// Switches the discipline and restarts from tick 0 (full reset).
    pub fn set_algorithm(&self, algorithm: Algorithm) {
        let mut guard = lock(&self.shared);
        guard.timer = None;
        guard.core.set_algorithm(algorithm);
        guard.emit();
    }

    /// Sets the quantum (clamped to ≥ 1); the live counter retargets
    /// immediately, without a reset.
    pub fn set_quantum(&self, quantum: u64) {
        let mut guard = lock(&self.shared);
        guard.core.set_quantum(quantum);
        guard.emit();
    }

    /// Sets the tick interval (clamped to ≥ 250 ms), re-arming the timer at
    /// the new period when currently running. Elapsed ticks are unaffected.
    pub fn set_tick_interval_ms(&self, ms: u64) {
        let mut guard = lock(&self.shared);
        guard.core.set_tick_interval_ms(ms);
        if guard.timer.is_some() {
            let interval = Duration::from_millis(guard.core.config().tick_interval_ms);
            guard.timer = Some(self.arm(&mut guard, interval));
        }
        guard.emit();
    }

    /// Advances simulated time by one unit and emits.
    ///
    /// Invoked by the timer while running; also usable directly for
    /// headless stepping.
    pub fn step(&self) {
        lock(&self.shared).step_and_publish();
    }

    /// The current state as an independently owned snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let guard = lock(&self.shared);
        build_snapshot(&guard.core, guard.timer.is_some())
    }

    /// Registers a subscriber. The current snapshot is delivered before
    /// this returns, so the subscription starts from the present state.
    pub fn subscribe(&self) -> Subscription {
        let mut guard = lock(&self.shared);
        let current = build_snapshot(&guard.core, guard.timer.is_some());
        let (id, rx) = guard.publisher.subscribe(&current);
        Subscription {
            id,
            rx,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Removes exactly the subscriber with the given token.
    pub fn unsubscribe(&self, id: SubscriberId) {
        lock(&self.shared).publisher.unsubscribe(id);
    }

    fn arm(&self, guard: &mut Shared, interval: Duration) -> TickTimer {
        let generation = guard.next_generation;
        guard.next_generation += 1;
        TickTimer::arm(Arc::downgrade(&self.shared), interval, generation)
    }
}

/// A live subscription to snapshot updates.
///
/// Snapshots queue on an internal channel; each one received is an
/// independent copy. `cancel` (or [`Simulator::unsubscribe`]) stops
/// delivery; merely dropping the subscription has the same effect after
/// the next publish prunes the dead channel.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<Snapshot>,
    shared: Weak<Mutex<Shared>>,
}

impl Subscription {
    /// This subscription's token.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Blocks until the next snapshot. `None` once the engine is gone.
    pub fn recv(&self) -> Option<Snapshot> {
        self.rx.recv().ok()
    }

    /// Waits up to `timeout` for the next snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Snapshot> {
        match self.rx.recv_timeout(timeout) {
            Ok(snapshot) => Some(snapshot),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Returns a queued snapshot without blocking, if one is pending.
    pub fn try_recv(&self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }

    /// Unregisters this subscriber.
    pub fn cancel(self) {
        if let Some(shared) = self.shared.upgrade() {
            lock(&shared).publisher.unsubscribe(self.id);
        }
    }
}
