//! Inputs and outputs of simultaneous-request resolution.

use dp_core::{PhilosopherId, Side};
use dp_events::Priority;

/// One request for a contested chopstick, in batch order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Contender {
    pub philosopher: PhilosopherId,
    pub side:        Side,
    pub priority:    Priority,
}

/// Which contender won, by index into the contender slice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub winner: usize,
    /// `true` when the strategy does not expect contention and fell back to
    /// first-requester-wins.
    pub fallback: bool,
}
