//! Driving timer.
//!
//! An explicit, cancellable scheduled-task handle; the disarmed state is
//! the `None` sentinel in the engine state, never an ambient global. Each
//! arming gets a fresh generation number, checked under the engine lock
//! before every step, so a stale thread from a previous arming can never
//! step after a disarm or re-arm. Cancellation is coarse: dropping the
//! handle stops the *next* tick but never interrupts one in flight.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Mutex, Weak};
use std::thread;
use std::time::Duration;

use log::trace;

use super::Shared;

/// Handle to an armed periodic timer. Dropping it disarms.
#[derive(Debug)]
pub(crate) struct TickTimer {
    generation: u64,
    // Dropping the sender wakes the thread, which then exits.
    _stop: mpsc::Sender<()>,
}

impl TickTimer {
    /// Arms a timer that steps the engine every `interval`.
    ///
    /// The thread holds only a weak reference, so a dropped simulator winds
    /// its timer down on the next wakeup.
    pub(crate) fn arm(shared: Weak<Mutex<Shared>>, interval: Duration, generation: u64) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let Some(shared) = shared.upgrade() else {
                        break;
                    };
                    let mut guard = super::lock(&shared);
                    // A disarm or re-arm changed the armed generation while
                    // this thread was waiting; exit without stepping.
                    if guard.armed_generation() != Some(generation) {
                        break;
                    }
                    trace!("timer tick (generation {generation})");
                    guard.step_and_publish();
                    if guard.core.is_finished() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Self {
            generation,
            _stop: stop_tx,
        }
    }

    /// Generation this timer was armed with.
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}
