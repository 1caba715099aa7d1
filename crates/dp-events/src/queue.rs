//! `EventQueue`: time-ordered multiset of pending events plus the clock.
//!
//! # Ordering
//!
//! Events are bucketed by fire time in a `BTreeMap`, so finding the next
//! batch is O(log W) where W is the number of distinct pending times.  Inside
//! a bucket the order is `(priority desc, seq asc)`: the insertion sequence
//! makes the order deterministic for a fixed schedule, never dependent on
//! hash iteration or allocation.
//!
//! # Invariant
//!
//! Delays are unsigned and measured from the clock, which only moves forward
//! to the time of a popped batch, so the queue never holds an event earlier
//! than the current time.

use std::collections::BTreeMap;

use dp_core::{PhilosopherId, SimClock, Tick};

use crate::{Event, EventKind, Priority};

/// All events sharing one fire time, in processing order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub time: Tick,
    pub events: Vec<Event>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Pending events keyed by fire time, and the logical clock they drive.
#[derive(Default)]
pub struct EventQueue {
    inner: BTreeMap<Tick, Vec<Event>>,
    clock: SimClock,
    next_seq: u64,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time (fire time of the last popped batch).
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    /// Schedule `kind` for `philosopher` at `now + delay` and return the
    /// fire time.  A zero delay is allowed and lands in the current tick.
    pub fn schedule(
        &mut self,
        delay:       u64,
        kind:        EventKind,
        philosopher: PhilosopherId,
        priority:    Priority,
    ) -> Tick {
        let fire_time = self.clock.after(delay);
        let event = Event { fire_time, kind, philosopher, priority, seq: self.next_seq };
        self.next_seq += 1;
        self.inner.entry(fire_time).or_default().push(event);
        self.total += 1;
        fire_time
    }

    /// Remove and return every event at the earliest pending time, advancing
    /// the clock to it.
    ///
    /// Returns `None` when the queue is empty (the simulation is exhausted).
    pub fn pop_next_batch(&mut self) -> Option<Batch> {
        let (time, mut events) = self.inner.pop_first()?;
        self.total -= events.len();
        self.clock.advance_to(time);
        events.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
        Some(Batch { time, events })
    }

    /// The earliest pending fire time, or `None` if empty.
    pub fn next_time(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Pending events belonging to `philosopher`, earliest first.
    pub fn pending_for(&self, philosopher: PhilosopherId) -> Vec<Event> {
        self.inner
            .values()
            .flatten()
            .filter(|e| e.philosopher == philosopher)
            .copied()
            .collect()
    }

    /// Drop every pending event and rewind the clock to zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Total number of pending events.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct pending fire times.
    pub fn batch_count(&self) -> usize {
        self.inner.len()
    }
}
