//! Simulation observer trait for progress reporting and data collection.

use dp_core::Tick;

use crate::{Conflict, Snapshot, Terminal};

/// Callbacks invoked by [`Sim::step_with`][crate::Sim::step_with] and
/// [`Sim::run`][crate::Sim::run] around each batch.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example (conflict counter)
///
/// ```rust,ignore
/// struct Contested(u64);
///
/// impl SimObserver for Contested {
///     fn on_conflict(&mut self, _conflict: &Conflict) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after a batch is popped, before anything in it is applied.
    fn on_batch_start(&mut self, _time: Tick) {}

    /// Called once per contested chopstick, after the winner is chosen.
    fn on_conflict(&mut self, _conflict: &Conflict) {}

    /// Called after the batch is applied, audited and checked for deadlock.
    fn on_batch_end(&mut self, _snapshot: &Snapshot) {}

    /// Called once when the simulation reaches a terminal outcome.
    fn on_terminal(&mut self, _terminal: Terminal, _snapshot: &Snapshot) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
