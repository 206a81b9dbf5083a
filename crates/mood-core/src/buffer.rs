//! Shared store between the ingestion path and the tick path.
//!
//! A cheap-to-clone handle over a mutex-guarded `Vec<Event>`. Events are
//! fully built before they are pushed, and readers only ever receive a
//! cloned `Vec`, so neither side can observe a half-written event or a list
//! mid-resize. Critical sections are a push, a `retain` or a clone; the
//! producer never waits on network I/O or on clustering.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::event::Event;
use crate::retention::{RetainedSet, is_retained, prune};

#[derive(Clone, Debug, Default)]
pub struct EventBuffer {
    inner: Arc<Mutex<Vec<Event>>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning cannot leave a torn Vec here; take the guard back.
    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, event: Event) {
        self.lock().push(event);
    }

    pub fn extend(&self, events: impl IntoIterator<Item = Event>) {
        let events: Vec<Event> = events.into_iter().collect();
        self.lock().extend(events);
    }

    /// Consistent copy of everything currently buffered.
    pub fn snapshot(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// Evict expired events in place and return the survivors as one
    /// atomic snapshot.
    pub fn prune(&self, now: f64, window: f64) -> RetainedSet {
        let mut events = self.lock();
        events.retain(|e| is_retained(e, now, window));
        prune(&events, now, window)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
