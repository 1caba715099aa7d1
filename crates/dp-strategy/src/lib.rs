//! `dp-strategy`: the pluggable rule set for taking chopsticks.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`strategy`] | `Strategy` enum: first side, acquisition gate, tie-break |
//! | [`gate`]     | `Admission`, `Refusal`: outcome of the acquisition gate |
//! | [`tiebreak`] | `Contender`, `Verdict`: outcome of a contested chopstick |
//!
//! # Design notes
//!
//! The set of strategies is closed, so it is an enum rather than a trait
//! object.  Each variant answers the same three questions:
//!
//! 1. Which chopstick does a newly hungry philosopher reach for first?
//! 2. May this philosopher take this chopstick right now?
//! 3. Who wins when several requests for one chopstick arrive in one batch?
//!
//! Adding a strategy means adding a variant and its arms in these three
//! methods; the simulation loop never branches on the strategy itself.

pub mod gate;
pub mod strategy;
pub mod tiebreak;


pub use gate::{Admission, Refusal};
pub use strategy::Strategy;
pub use tiebreak::{Contender, Verdict};
