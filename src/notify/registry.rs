// src/notify/registry.rs

//! Live observer set.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::notify::events::{MAX_EVENT_BATCH, ScheduleEvent};

pub type ObserverId = u64;

/// Receiving end handed to an observer on registration.
#[derive(Debug)]
pub struct Subscription {
    id: ObserverId,
    rx: mpsc::Receiver<ScheduleEvent>,
}

impl Subscription {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Next event, or `None` once the observer has been dropped from the
    /// registry and its queue is drained.
    pub async fn recv(&mut self) -> Option<ScheduleEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ScheduleEvent> {
        self.rx.try_recv().ok()
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Observers that received every event of the batch.
    pub delivered: usize,
    /// Observers removed because their queue was full or closed.
    pub dropped: Vec<ObserverId>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: ObserverId,
    observers: BTreeMap<ObserverId, mpsc::Sender<ScheduleEvent>>,
}

/// Registry of subscribed observers.
///
/// Registration, removal and broadcast all take the same lock, so the set
/// cannot change under an iteration and a new observer's initial events are
/// always queued before any broadcast reaches it.
///
/// Delivery never waits: each observer has a bounded queue and a full or
/// closed queue gets the observer removed. A batch is delivered whole or not
/// at all, so an observer never holds point events without the schedule
/// that follows them.
#[derive(Debug)]
pub struct ObserverRegistry {
    capacity: usize,
    inner: Mutex<RegistryInner>,
}

impl ObserverRegistry {
    /// `capacity` is the per-observer queue length, raised to
    /// [`MAX_EVENT_BATCH`] so a caught-up observer always has room for one
    /// full publish.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(MAX_EVENT_BATCH),
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.lock().observers.contains_key(&id)
    }

    /// Add an observer whose queue starts with `initial` events.
    pub fn register(&self, initial: Vec<ScheduleEvent>) -> Subscription {
        let capacity = self.capacity.max(initial.len());
        let (tx, rx) = mpsc::channel(capacity);

        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;

        for event in initial {
            // Fresh channel with room for every initial event.
            let _ = tx.try_send(event);
        }
        inner.observers.insert(id, tx);
        debug!(observer = id, observers = inner.observers.len(), "observer registered");

        Subscription { id, rx }
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut inner = self.lock();
        let removed = inner.observers.remove(&id).is_some();
        if removed {
            debug!(observer = id, observers = inner.observers.len(), "observer unregistered");
        }
        removed
    }

    /// Deliver `events`, in order, to every registered observer.
    pub fn broadcast(&self, events: &[ScheduleEvent]) -> BroadcastReport {
        let mut inner = self.lock();
        let mut report = BroadcastReport::default();

        for (&id, tx) in inner.observers.iter() {
            match deliver(tx, events) {
                Ok(()) => report.delivered += 1,
                Err(reason) => {
                    warn!(observer = id, reason, "observer delivery failed; dropping observer");
                    report.dropped.push(id);
                }
            }
        }

        for id in &report.dropped {
            inner.observers.remove(id);
        }

        debug!(
            events = events.len(),
            delivered = report.delivered,
            dropped = report.dropped.len(),
            "broadcast complete"
        );
        report
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // The map stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn deliver(
    tx: &mpsc::Sender<ScheduleEvent>,
    events: &[ScheduleEvent],
) -> Result<(), &'static str> {
    if events.is_empty() {
        return Ok(());
    }
    // Reserve the whole batch first; nothing is sent unless all of it fits.
    let permits = tx.try_reserve_many(events.len()).map_err(|err| match err {
        TrySendError::Full(()) => "queue full",
        TrySendError::Closed(()) => "disconnected",
    })?;
    for (permit, event) in permits.zip(events) {
        permit.send(event.clone());
    }
    Ok(())
}
