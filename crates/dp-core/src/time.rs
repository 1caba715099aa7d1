//! Logical time model.
//!
//! # Design
//!
//! Time is a monotonically non-decreasing `Tick` counter.  Ticks have no
//! wall-clock meaning: playback pacing (how long one tick lasts on screen) is
//! chosen by whoever drives the engine, not by the engine itself.
//!
//! Unlike a fixed-step loop, the clock does not advance by one each
//! iteration.  It jumps straight to the fire time of the next pending event
//! batch, and several batches may share one tick (zero-delay follow-ups).

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute logical time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The engine's current logical time.
///
/// Only ever moves forward; `advance_to` with an earlier tick is ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    current_tick: Tick,
}

impl SimClock {
    /// A clock at `Tick::ZERO`.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.current_tick
    }

    /// Jump forward to `tick` (the fire time of the batch being processed).
    #[inline]
    pub fn advance_to(&mut self, tick: Tick) {
        if tick > self.current_tick {
            self.current_tick = tick;
        }
    }

    /// Absolute tick `delay` ticks from now.
    #[inline]
    pub fn after(&self, delay: u64) -> Tick {
        self.current_tick + delay
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.current_tick.fmt(f)
    }
}
