//! `dp-sim`: batch-step controller for the dining-philosophers engine.
//!
//! # One step, one batch
//!
//! ```text
//! step():
//!   ① Pop     : every event at the earliest pending time (the clock jumps).
//!   ② Resolve : group pickups by chopstick; ≥2 requests is a conflict.
//!               The strategy picks one winner, losers go WAITING and retry
//!               after one tick with priority + 1.
//!   ③ Apply   : END_EATING, then END_THINKING, then pickups through the
//!               strategy's acquisition gate.  Zero-delay follow-ups land in
//!               the same tick and form the next batch.
//!   ④ Audit   : chopstick exclusivity and conservation.
//!   ⑤ Detect  : every philosopher WAITING with only its left chopstick
//!               → DEADLOCK, and the table is frozen until reset.
//! ```
//!
//! Terminal outcomes ([`Terminal::Exhausted`], [`Terminal::Deadlock`]) are
//! values, not errors.  [`SimError`] is reserved for rejected configuration
//! (state unchanged) and broken invariants (fatal until re-initialized).
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dp_core::{SimRng, StrategyKind};
//! use dp_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimRng::new(7))
//!     .strategy(StrategyKind::ResourceHierarchy)
//!     .build()?;
//! let outcome = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod conflict;
pub mod deadlock;
pub mod error;
pub mod observer;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use conflict::{Conflict, Resolution};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{RETRY_DELAY, Sim};
pub use snapshot::{Lifecycle, SimStats, Snapshot, StepOutcome, Terminal};
