//! Immutable views handed to renderers, statistics panels and pacing drivers.

use dp_core::{StrategyKind, Tick};
use dp_table::{Chopstick, DiningTable, Philosopher};

/// Controller lifecycle.  Pacing itself happens outside the engine; these
/// states only tell the driver whether it should keep calling `step`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifecycle {
    /// Freshly initialized, nothing processed yet.
    #[default]
    Idle,
    Running,
    Paused,
    /// Queue exhausted, deadlock declared, or halted by a fatal error.
    Stopped,
}

/// Why the simulation stopped.  Not errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminal {
    /// No pending events remain.
    Exhausted,
    /// Circular wait declared; nothing changes until reset.
    Deadlock,
}

/// Table-wide counters.  Zeroed on initialize.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimStats {
    /// Current logical time.
    pub time:                 Tick,
    /// Batches processed.
    pub batches:              u64,
    /// Events popped from the queue, including conflict losers.
    pub events_processed:     u64,
    /// Contested chopsticks (one per chopstick per batch).
    pub conflicts:            u64,
    /// Conflicts decided by the first-requester fallback.
    pub fallback_resolutions: u64,
    pub deadlock:             bool,
}

/// Everything a renderer needs, captured between steps.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub strategy:       StrategyKind,
    pub lifecycle:      Lifecycle,
    pub stats:          SimStats,
    pub philosophers:   Vec<Philosopher>,
    pub chopsticks:     Vec<Chopstick>,
    pub pending_events: usize,
}

impl Snapshot {
    pub(crate) fn capture(
        table:          &DiningTable,
        strategy:       StrategyKind,
        lifecycle:      Lifecycle,
        stats:          SimStats,
        pending_events: usize,
    ) -> Self {
        Self {
            strategy,
            lifecycle,
            stats,
            philosophers: table.philosophers().to_vec(),
            chopsticks:   table.chopsticks().iter().copied().collect(),
            pending_events,
        }
    }

    #[inline]
    pub fn time(&self) -> Tick {
        self.stats.time
    }

    /// Chopsticks currently on the table.
    pub fn available_chopsticks(&self) -> usize {
        self.chopsticks.iter().filter(|c| c.is_available()).count()
    }
}

/// Result of one `step`.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// One batch processed.
    Advanced(Snapshot),
    /// The queue is empty, or deadlock has been declared (by this step or an
    /// earlier one).
    Finished(Terminal),
}

impl StepOutcome {
    pub fn terminal(&self) -> Option<Terminal> {
        match self {
            StepOutcome::Advanced(_) => None,
            StepOutcome::Finished(t) => Some(*t),
        }
    }
}
