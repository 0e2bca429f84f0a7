//! Snapshot distribution.
//!
//! Registry of subscribers keyed by an opaque, monotonically assigned
//! token, so removal is exact and never ambiguous. Each publish clones the
//! snapshot once per subscriber; a delivered copy is independently owned.
//! Delivery is a channel send only, so no subscriber code ever runs while
//! the engine lock is held.

use std::sync::mpsc;

use super::Snapshot;

/// Opaque subscriber token. Stable for the life of the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Token-keyed subscriber registry.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    next_id: u64,
    subscribers: Vec<(SubscriberId, mpsc::Sender<Snapshot>)>,
}

impl SnapshotPublisher {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and delivers `current` to it before
    /// returning, so every subscriber starts from the present state.
    pub fn subscribe(&mut self, current: &Snapshot) -> (SubscriberId, mpsc::Receiver<Snapshot>) {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = mpsc::channel();
        // The receiver is alive, this send cannot fail.
        let _ = tx.send(current.clone());
        self.subscribers.push((id, tx));
        (id, rx)
    }

    /// Removes exactly the subscriber with the given token.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Delivers an independent copy of `snapshot` to every subscriber,
    /// pruning any whose receiving end has been dropped.
    pub fn publish(&mut self, snapshot: &Snapshot) {
        self.subscribers
            .retain(|(_, tx)| tx.send(snapshot.clone()).is_ok());
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::SimResults;
    use crate::models::{Algorithm, Timeline};

    fn snapshot(time: u64) -> Snapshot {
        Snapshot {
            algorithm: Algorithm::Fcfs,
            quantum: 2,
            tick_interval_ms: 3000,
            time,
            timeline: Timeline::new(),
            ready_queue: Vec::new(),
            processes: Vec::new(),
            results: SimResults::default(),
            running: false,
            finished: false,
        }
    }

    #[test]
    fn test_subscribe_delivers_current_immediately() {
        let mut publisher = SnapshotPublisher::new();
        let (_, rx) = publisher.subscribe(&snapshot(7));
        assert_eq!(rx.try_recv().unwrap().time, 7);
    }

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let mut publisher = SnapshotPublisher::new();
        let (_, rx1) = publisher.subscribe(&snapshot(0));
        let (_, rx2) = publisher.subscribe(&snapshot(0));
        publisher.publish(&snapshot(3));
        let _ = rx1.try_recv().unwrap();
        let _ = rx2.try_recv().unwrap();
        assert_eq!(rx1.try_recv().unwrap().time, 3);
        assert_eq!(rx2.try_recv().unwrap().time, 3);
    }

    #[test]
    fn test_unsubscribe_removes_exactly_one() {
        let mut publisher = SnapshotPublisher::new();
        let (id1, rx1) = publisher.subscribe(&snapshot(0));
        let (_, rx2) = publisher.subscribe(&snapshot(0));
        publisher.unsubscribe(id1);
        assert_eq!(publisher.subscriber_count(), 1);
        publisher.publish(&snapshot(5));
        let _ = rx1.try_recv().unwrap(); // initial only
        assert!(rx1.try_recv().is_err());
        let _ = rx2.try_recv().unwrap();
        assert_eq!(rx2.try_recv().unwrap().time, 5);
    }

    #[test]
    fn test_publish_prunes_dropped_receivers() {
        let mut publisher = SnapshotPublisher::new();
        let (_, rx) = publisher.subscribe(&snapshot(0));
        drop(rx);
        publisher.publish(&snapshot(1));
        assert_eq!(publisher.subscriber_count(), 0);
    }
}
