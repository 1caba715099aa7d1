//! Per-philosopher state machine and statistics.
//!
//! ```text
//! THINKING ──END_THINKING──▶ HUNGRY ──pickup refused──▶ WAITING
//!     ▲                        │  ▲                        │
//!     │                        │  └──── first chopstick ───┤
//!     │                        ▼                           │
//!     └────END_EATING───── EATING ◀─── second chopstick ───┘
//!
//! WAITING ──deadlock declared──▶ DEADLOCK (terminal until reset)
//! ```
//!
//! Methods here only update the philosopher record.  Chopstick ownership is
//! changed through [`DiningTable`](crate::DiningTable), which keeps the
//! `has_*` flags and the resource table in step.

use std::fmt;

use dp_core::{ChopstickId, PhilosopherId, Side, Tick};

use crate::{TableError, TableResult};

/// What a philosopher is currently doing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhilosopherState {
    Thinking,
    Hungry,
    Waiting,
    Eating,
    Deadlock,
}

impl PhilosopherState {
    pub fn name(self) -> &'static str {
        match self {
            PhilosopherState::Thinking => "THINKING",
            PhilosopherState::Hungry   => "HUNGRY",
            PhilosopherState::Waiting  => "WAITING",
            PhilosopherState::Eating   => "EATING",
            PhilosopherState::Deadlock => "DEADLOCK",
        }
    }

    /// `true` while the philosopher wants chopsticks.
    #[inline]
    pub fn is_hungry(self) -> bool {
        matches!(self, PhilosopherState::Hungry | PhilosopherState::Waiting)
    }
}

impl fmt::Display for PhilosopherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── PhilosopherStats ──────────────────────────────────────────────────────────

/// Accumulated phase durations (in ticks) and phase entry counts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhilosopherStats {
    pub thinking_time:  u64,
    pub thinking_count: u64,
    pub hungry_count:   u64,
    /// Ticks spent between becoming hungry and starting to eat.
    pub waiting_time:   u64,
    pub waiting_count:  u64,
    /// Meals started; the divisor for `avg_waiting`.
    pub meals:          u64,
    pub eating_time:    u64,
    pub eating_count:   u64,
}

impl PhilosopherStats {
    pub fn avg_thinking(&self) -> f64 {
        average(self.thinking_time, self.thinking_count)
    }

    pub fn avg_eating(&self) -> f64 {
        average(self.eating_time, self.eating_count)
    }

    pub fn avg_waiting(&self) -> f64 {
        average(self.waiting_time, self.meals)
    }
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { total as f64 / count as f64 }
}

// ── Philosopher ───────────────────────────────────────────────────────────────

/// Result of successfully taking a chopstick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Took {
    /// Holding one chopstick; the other side is still needed.
    First,
    /// Holding both; the philosopher is now eating.
    Both,
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Philosopher {
    id:                PhilosopherId,
    state:             PhilosopherState,
    left:              ChopstickId,
    right:             ChopstickId,
    has_left:          bool,
    has_right:         bool,
    last_state_change: Tick,
    hungry_since:      Tick,
    stats:             PhilosopherStats,
}

impl Philosopher {
    /// A thinking philosopher at seat `id` of a `seats`-seat table.
    pub fn new(id: PhilosopherId, seats: usize) -> Self {
        Self {
            id,
            state:             PhilosopherState::Thinking,
            left:              id.chopstick(Side::Left, seats),
            right:             id.chopstick(Side::Right, seats),
            has_left:          false,
            has_right:         false,
            last_state_change: Tick::ZERO,
            hungry_since:      Tick::ZERO,
            stats:             PhilosopherStats::default(),
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline] pub fn id(&self) -> PhilosopherId { self.id }
    #[inline] pub fn state(&self) -> PhilosopherState { self.state }
    #[inline] pub fn left(&self) -> ChopstickId { self.left }
    #[inline] pub fn right(&self) -> ChopstickId { self.right }
    #[inline] pub fn has_left(&self) -> bool { self.has_left }
    #[inline] pub fn has_right(&self) -> bool { self.has_right }
    #[inline] pub fn last_state_change(&self) -> Tick { self.last_state_change }
    #[inline] pub fn stats(&self) -> &PhilosopherStats { &self.stats }

    /// The chopstick on `side`.
    #[inline]
    pub fn chopstick(&self, side: Side) -> ChopstickId {
        match side {
            Side::Left  => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub fn holds(&self, side: Side) -> bool {
        match side {
            Side::Left  => self.has_left,
            Side::Right => self.has_right,
        }
    }

    /// `true` if holding `chopstick` on either side.
    pub fn holds_chopstick(&self, chopstick: ChopstickId) -> bool {
        (self.has_left && self.left == chopstick) || (self.has_right && self.right == chopstick)
    }

    #[inline]
    pub fn holds_any(&self) -> bool {
        self.has_left || self.has_right
    }

    #[inline]
    pub fn holds_both(&self) -> bool {
        self.has_left && self.has_right
    }

    /// The lower-numbered of the two chopsticks.
    #[inline]
    pub fn lower_side(&self) -> Side {
        if self.left <= self.right { Side::Left } else { Side::Right }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// END_THINKING: THINKING → HUNGRY, recording the thinking phase.
    pub fn finish_thinking(&mut self, now: Tick) -> TableResult<()> {
        self.expect(PhilosopherState::Thinking, "THINKING")?;
        self.stats.thinking_time += now.since(self.last_state_change);
        self.stats.thinking_count += 1;
        self.stats.hungry_count += 1;
        self.hungry_since = now;
        self.set_state(PhilosopherState::Hungry, now);
        Ok(())
    }

    /// A pickup was refused.  Returns `true` if this entered WAITING.
    pub fn wait(&mut self, now: Tick) -> TableResult<bool> {
        self.expect_hungry()?;
        if self.state == PhilosopherState::Waiting {
            return Ok(false);
        }
        self.stats.waiting_count += 1;
        self.set_state(PhilosopherState::Waiting, now);
        Ok(true)
    }

    /// Lost a simultaneous request.  Always counts as a wait, even if the
    /// philosopher was already WAITING.
    pub fn lose_conflict(&mut self, now: Tick) -> TableResult<()> {
        self.expect_hungry()?;
        self.stats.waiting_count += 1;
        self.set_state(PhilosopherState::Waiting, now);
        Ok(())
    }

    /// Circular wait declared: WAITING → DEADLOCK.  No-op in any other state.
    pub fn deadlock(&mut self, now: Tick) -> bool {
        if self.state != PhilosopherState::Waiting {
            return false;
        }
        self.set_state(PhilosopherState::Deadlock, now);
        true
    }

    /// Mark `side` as held.  The caller has already updated the resource table.
    pub(crate) fn take(&mut self, side: Side, now: Tick) -> TableResult<Took> {
        self.expect_hungry()?;
        if self.holds(side) {
            return Err(TableError::AlreadyHolding { philosopher: self.id, side });
        }
        match side {
            Side::Left  => self.has_left = true,
            Side::Right => self.has_right = true,
        }
        if self.holds_both() {
            self.stats.waiting_time += now.since(self.hungry_since);
            self.stats.meals += 1;
            self.set_state(PhilosopherState::Eating, now);
            Ok(Took::Both)
        } else {
            self.set_state(PhilosopherState::Hungry, now);
            Ok(Took::First)
        }
    }

    /// END_EATING: EATING → THINKING, recording the meal and dropping both
    /// flags.  The caller releases the chopsticks in the resource table.
    pub(crate) fn finish_eating(&mut self, now: Tick) -> TableResult<()> {
        self.expect(PhilosopherState::Eating, "EATING")?;
        self.stats.eating_time += now.since(self.last_state_change);
        self.stats.eating_count += 1;
        self.has_left = false;
        self.has_right = false;
        self.set_state(PhilosopherState::Thinking, now);
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn set_state(&mut self, state: PhilosopherState, now: Tick) {
        if self.state != state {
            self.state = state;
            self.last_state_change = now;
        }
    }

    fn expect(&self, state: PhilosopherState, expected: &'static str) -> TableResult<()> {
        if self.state != state {
            return Err(TableError::UnexpectedState { philosopher: self.id, expected, found: self.state });
        }
        Ok(())
    }

    fn expect_hungry(&self) -> TableResult<()> {
        if !self.state.is_hungry() {
            return Err(TableError::UnexpectedState {
                philosopher: self.id,
                expected:    "HUNGRY or WAITING",
                found:       self.state,
            });
        }
        Ok(())
    }
}
