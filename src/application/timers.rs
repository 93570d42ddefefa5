//! Deadline timers scoped to one mounted screen.
//!
//! A screen owns a [`Timers`] value and drains due events from the event loop
//! tick with [`Timers::poll`]. Timers never outlive their owner: unmounting the
//! screen drops every pending timer, and [`Timers::clear`] cancels them all when
//! a game restarts in place.

use std::time::{Duration, Instant};

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    due: Instant,
    period: Option<Duration>,
    event: E,
}

#[derive(Debug)]
pub struct Timers<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Clone> Timers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, due: Instant, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            period,
            event,
        });
        id
    }

    /// Fires `event` once, `delay` after `now`.
    pub fn after(&mut self, delay: Duration, event: E, now: Instant) -> TimerId {
        self.push(now + delay, None, event)
    }

    /// Fires `event` every `period`, first at `now + period`.
    pub fn every(&mut self, period: Duration, event: E, now: Instant) -> TimerId {
        self.push(now + period, Some(period), event)
    }

    /// Cancels one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Cancels every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the events due at `now`, earliest first.
    ///
    /// One-shot timers are removed once they fire. Interval timers are
    /// re-armed and fire once per elapsed period, so a late poll catches up.
    pub fn poll(&mut self, now: Instant) -> Vec<E> {
        let mut fired: Vec<(Instant, u64, E)> = Vec::new();

        self.entries.retain_mut(|entry| {
            while entry.due <= now {
                fired.push((entry.due, entry.id.0, entry.event.clone()));
                match entry.period {
                    Some(period) if !period.is_zero() => entry.due += period,
                    _ => return false,
                }
            }
            true
        });

        fired.sort_by_key(|(due, id, _)| (*due, *id));
        fired.into_iter().map(|(_, _, event)| event).collect()
    }
}
