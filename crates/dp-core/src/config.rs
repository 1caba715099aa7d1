//! Table configuration.
//!
//! `TableConfig` is the whole caller-supplied configuration surface of the
//! engine.  It is plain data: build it in code, or (with the `serde` feature)
//! load it from JSON, then hand it to the simulation builder which calls
//! [`TableConfig::validate`] before touching any state.

use std::fmt;
use std::str::FromStr;

use crate::{DpError, DpResult};

/// Default seat count.
pub const DEFAULT_PHILOSOPHERS: usize = 5;

/// Default bound on `Sim::run`.
pub const DEFAULT_MAX_BATCHES: u64 = 10_000;

// ── StrategyKind ──────────────────────────────────────────────────────────────

/// Name of a resource-acquisition strategy.
///
/// Parsing is case-insensitive; `Display` yields the canonical name.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StrategyKind {
    /// Left then right, greatest id wins a contested chopstick.
    #[default]
    Basic,
    /// Left then right, a uniformly random contender wins.
    Random,
    /// At most `waiter_permissions` philosophers may hold chopsticks.
    Waiter,
    /// Chopsticks are always taken lowest index first.
    ResourceHierarchy,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Basic,
        StrategyKind::Random,
        StrategyKind::Waiter,
        StrategyKind::ResourceHierarchy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Basic             => "basic",
            StrategyKind::Random            => "random",
            StrategyKind::Waiter            => "waiter",
            StrategyKind::ResourceHierarchy => "resource-hierarchy",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = DpError;

    fn from_str(s: &str) -> DpResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic"                                      => Ok(StrategyKind::Basic),
            "random"                                     => Ok(StrategyKind::Random),
            "waiter"                                     => Ok(StrategyKind::Waiter),
            "resource-hierarchy" | "resource_hierarchy"
            | "hierarchy"                                => Ok(StrategyKind::ResourceHierarchy),
            _ => Err(DpError::UnknownStrategy(s.to_owned())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── DurationRange ─────────────────────────────────────────────────────────────

/// Inclusive range of whole ticks a thinking or eating phase may last.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationRange {
    pub min: u64,
    pub max: u64,
}

impl DurationRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// A range that always yields `ticks`.
    pub const fn fixed(ticks: u64) -> Self {
        Self { min: ticks, max: ticks }
    }

    /// `true` if `ticks` lies inside the range.
    #[inline]
    pub fn contains(&self, ticks: u64) -> bool {
        (self.min..=self.max).contains(&ticks)
    }

    fn validate(&self, what: &'static str) -> DpResult<()> {
        // A zero-length phase would let END_THINKING and END_EATING collapse
        // into the tick that scheduled them.
        if self.min == 0 || self.min > self.max {
            return Err(DpError::DurationRange { what, min: self.min, max: self.max });
        }
        Ok(())
    }
}

impl Default for DurationRange {
    /// Discrete uniform `[1, 10]`.
    fn default() -> Self {
        Self::new(1, 10)
    }
}

// ── TableConfig ───────────────────────────────────────────────────────────────

/// Everything needed to (re)initialize a table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// Seat count N.  Must be at least 2.
    pub philosophers: usize,

    /// Acquisition and tie-break rule set.
    pub strategy: StrategyKind,

    /// Admission cap for the waiter strategy.  `None` means `philosophers - 1`.
    /// Validated for every strategy so switching to `waiter` later can't fail.
    pub waiter_permissions: Option<usize>,

    /// Range thinking durations are drawn from.
    pub think_range: DurationRange,

    /// Range eating durations are drawn from.
    pub eat_range: DurationRange,

    /// Upper bound on the number of batches `Sim::run` processes.
    pub max_batches: u64,
}

impl TableConfig {
    /// Default configuration for `philosophers` seats and `strategy`.
    pub fn new(philosophers: usize, strategy: StrategyKind) -> Self {
        Self { philosophers, strategy, ..Self::default() }
    }

    /// The effective waiter permission count.
    #[inline]
    pub fn permissions(&self) -> usize {
        self.waiter_permissions
            .unwrap_or(self.philosophers.saturating_sub(1))
    }

    /// Check every field; returns the first problem found.
    pub fn validate(&self) -> DpResult<()> {
        if self.philosophers < 2 {
            return Err(DpError::TooFewPhilosophers(self.philosophers));
        }
        check_permissions(self.permissions(), self.philosophers)?;
        self.think_range.validate("thinking")?;
        self.eat_range.validate("eating")?;
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            philosophers:       DEFAULT_PHILOSOPHERS,
            strategy:           StrategyKind::Basic,
            waiter_permissions: None,
            think_range:        DurationRange::default(),
            eat_range:          DurationRange::default(),
            max_batches:        DEFAULT_MAX_BATCHES,
        }
    }
}

/// `1 ≤ permissions < philosophers`.
pub fn check_permissions(permissions: usize, philosophers: usize) -> DpResult<()> {
    if permissions == 0 || permissions >= philosophers {
        return Err(DpError::WaiterPermissions { permissions, philosophers });
    }
    Ok(())
}
