use serde::Serialize;

use crate::event::Event;
use crate::sentiment::SentimentCounts;

/// True when the event is strictly newer than `now - window`.
pub fn is_retained(event: &Event, now: f64, window: f64) -> bool {
    event.observed_at > now - window
}

/// Events still inside the retention window at a given instant.
///
/// A fresh copy per tick; every layer of one frame reads the same set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RetainedSet {
    events: Vec<Event>,
    now: f64,
    window: f64,
}

impl RetainedSet {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// The instant this set was pruned at.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    pub fn sentiment_counts(&self) -> SentimentCounts {
        self.events.iter().map(|e| e.sentiment).collect()
    }
}

impl<'a> IntoIterator for &'a RetainedSet {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Drop events with `observed_at <= now - window`, preserving order.
/// Age is the only criterion.
pub fn prune(events: &[Event], now: f64, window: f64) -> RetainedSet {
    RetainedSet {
        events: events
            .iter()
            .filter(|e| is_retained(e, now, window))
            .cloned()
            .collect(),
        now,
        window,
    }
}
