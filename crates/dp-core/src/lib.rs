//! `dp-core`: foundational types for the dining-philosophers engine.
//!
//! This crate is a dependency of every other `dp-*` crate.  It has no `dp-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `PhilosopherId`, `ChopstickId`, `Side`                    |
//! | [`time`]    | `Tick`, `SimClock`                                        |
//! | [`config`]  | `TableConfig`, `StrategyKind`, `DurationRange`            |
//! | [`rng`]     | `RandomSource` trait, `SimRng`, `ScriptedSource`, `Phase` |
//! | [`error`]   | `DpError`, `DpResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DurationRange, StrategyKind, TableConfig};
pub use error::{DpError, DpResult};
pub use ids::{ChopstickId, PhilosopherId, Side};
pub use rng::{Phase, RandomSource, ScriptedSource, SimRng};
pub use time::{SimClock, Tick};
