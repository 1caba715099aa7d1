//! Configuration error type.
//!
//! Every variant is a caller mistake reported synchronously by a mutating
//! setter or by `TableConfig::validate`; engine state is left untouched.
//! Broken runtime invariants live in `dp-table::TableError` and
//! `dp-sim::SimError` instead.

use thiserror::Error;

/// The configuration error shared by all `dp-*` crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DpError {
    #[error("unknown strategy {0:?} (expected basic, random, waiter or resource-hierarchy)")]
    UnknownStrategy(String),

    #[error("a table needs at least 2 philosophers, got {0}")]
    TooFewPhilosophers(usize),

    #[error("waiter permissions must be in 1..{philosophers}, got {permissions}")]
    WaiterPermissions {
        permissions:  usize,
        philosophers: usize,
    },

    #[error("invalid {what} duration range [{min}, {max}]")]
    DurationRange {
        what: &'static str,
        min:  u64,
        max:  u64,
    },
}

/// Shorthand result type for configuration-level operations.
pub type DpResult<T> = Result<T, DpError>;
