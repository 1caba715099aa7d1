//! Events: scheduled future actions of one philosopher.

use std::fmt;

use dp_core::{PhilosopherId, Side, Tick};

/// Tie-break weight.  Higher fires first among events at the same tick.
pub type Priority = u32;

/// What happens when an event fires.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// Thinking is over; the philosopher becomes hungry.
    EndThinking,
    /// Try to take the left chopstick.
    PickupLeft,
    /// Try to take the right chopstick.
    PickupRight,
    /// Eating is over; both chopsticks go back on the table.
    EndEating,
}

impl EventKind {
    /// The pickup event for `side`.
    #[inline]
    pub fn pickup(side: Side) -> EventKind {
        match side {
            Side::Left  => EventKind::PickupLeft,
            Side::Right => EventKind::PickupRight,
        }
    }

    /// `Some(side)` for pickup events, `None` otherwise.
    #[inline]
    pub fn pickup_side(self) -> Option<Side> {
        match self {
            EventKind::PickupLeft  => Some(Side::Left),
            EventKind::PickupRight => Some(Side::Right),
            EventKind::EndThinking | EventKind::EndEating => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::EndThinking => "END_THINKING",
            EventKind::PickupLeft  => "PICKUP_LEFT",
            EventKind::PickupRight => "PICKUP_RIGHT",
            EventKind::EndEating   => "END_EATING",
        })
    }
}

/// One scheduled action.  Immutable once created; consumed exactly once.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Absolute logical time at which the event fires.
    pub fire_time: Tick,
    pub kind: EventKind,
    pub philosopher: PhilosopherId,
    pub priority: Priority,
    /// Insertion order, unique per queue.  Final tie-break after priority.
    pub seq: u64,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @{}", self.kind, self.philosopher, self.fire_time)?;
        if self.priority > 0 {
            write!(f, " (priority {})", self.priority)?;
        }
        Ok(())
    }
}
