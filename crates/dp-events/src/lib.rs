//! `dp-events`: scheduled philosopher actions and the event queue.
//!
//! # Crate layout
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`event`]  | `Event`, `EventKind`, `Priority`                      |
//! | [`queue`]  | `EventQueue` (`BTreeMap<Tick, Vec<Event>>` + clock), `Batch` |
//!
//! # Batch model (summary)
//!
//! ```text
//! schedule(delay, kind, who)   → event at now + delay
//! pop_next_batch()             → every event at the minimum fire time,
//!                                clock advanced to that time
//! ```
//!
//! A zero-delay event scheduled while a batch at `t` is being applied lands
//! at `t` again and is returned by the *next* `pop_next_batch` call, so one
//! tick may be processed as several consecutive batches.

pub mod event;
pub mod queue;


pub use event::{Event, EventKind, Priority};
pub use queue::{Batch, EventQueue};
