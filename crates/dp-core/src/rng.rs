//! Injected randomness: phase durations and random tie-breaks.
//!
//! The engine never calls an ambient RNG.  Every random decision goes
//! through a [`RandomSource`] owned by the simulation, so a test can replace
//! it with a [`ScriptedSource`] and replay an exact scenario (for example
//! every philosopher thinking for exactly one tick to force the classic
//! circular wait).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::DurationRange;

/// Which timed phase a duration is being drawn for.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Thinking,
    Eating,
}

/// Source of every random decision the engine makes.
pub trait RandomSource {
    /// Length in ticks of the next `phase`, normally drawn from `range`.
    fn duration(&mut self, phase: Phase, range: DurationRange) -> u64;

    /// An index in `0..len`.  Only called with `len ≥ 1`.
    fn pick(&mut self, len: usize) -> usize;
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seeded pseudo-random source.  The same seed always produces the same run.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from the operating system.  Runs are not reproducible.
    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
    }
}

impl RandomSource for SimRng {
    #[inline]
    fn duration(&mut self, _phase: Phase, range: DurationRange) -> u64 {
        self.0.gen_range(range.min..=range.max)
    }

    #[inline]
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len.max(1))
    }
}

// ── ScriptedSource ────────────────────────────────────────────────────────────

/// Deterministic source that cycles through fixed scripts.
///
/// Durations are returned in order regardless of phase or range; picks are
/// reduced modulo `len`.  An empty pick script always picks index 0.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    durations: Vec<u64>,
    next_duration: usize,
    picks: Vec<usize>,
    next_pick: usize,
}

impl ScriptedSource {
    /// Cycle through `durations`.  An empty script yields 1.
    pub fn new(durations: Vec<u64>) -> Self {
        Self { durations, next_duration: 0, picks: Vec::new(), next_pick: 0 }
    }

    /// Every phase lasts exactly `ticks`.
    pub fn constant(ticks: u64) -> Self {
        Self::new(vec![ticks])
    }

    /// Cycle through `picks` for random tie-breaks.
    pub fn with_picks(mut self, picks: Vec<usize>) -> Self {
        self.picks = picks;
        self
    }
}

impl RandomSource for ScriptedSource {
    fn duration(&mut self, _phase: Phase, _range: DurationRange) -> u64 {
        if self.durations.is_empty() {
            return 1;
        }
        let d = self.durations[self.next_duration % self.durations.len()];
        self.next_duration += 1;
        d
    }

    fn pick(&mut self, len: usize) -> usize {
        if self.picks.is_empty() || len == 0 {
            return 0;
        }
        let p = self.picks[self.next_pick % self.picks.len()];
        self.next_pick += 1;
        p % len
    }
}
