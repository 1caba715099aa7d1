//! Fluent builder for constructing a [`Sim`].

use dp_core::{DurationRange, RandomSource, StrategyKind, TableConfig};

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// Starts from [`TableConfig::default`] (five philosophers, basic strategy,
/// durations in `[1, 10]`).  Nothing is validated until [`build`](Self::build).
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimRng::new(42))
///     .philosophers(7)
///     .strategy(StrategyKind::Waiter)
///     .waiter_permissions(5)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: RandomSource> {
    config: TableConfig,
    rng:    R,
}

impl<R: RandomSource> SimBuilder<R> {
    pub fn new(rng: R) -> Self {
        Self { config: TableConfig::default(), rng }
    }

    /// Replace the whole configuration (e.g. one loaded from a file).
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn philosophers(mut self, n: usize) -> Self {
        self.config.philosophers = n;
        self
    }

    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.config.strategy = kind;
        self
    }

    /// Admission limit for the waiter strategy.  Ignored by the others, but
    /// still validated.
    pub fn waiter_permissions(mut self, permissions: usize) -> Self {
        self.config.waiter_permissions = Some(permissions);
        self
    }

    pub fn think_range(mut self, range: DurationRange) -> Self {
        self.config.think_range = range;
        self
    }

    pub fn eat_range(mut self, range: DurationRange) -> Self {
        self.config.eat_range = range;
        self
    }

    /// Upper bound on batches for [`Sim::run`].
    pub fn max_batches(mut self, n: u64) -> Self {
        self.config.max_batches = n;
        self
    }

    /// Validate the configuration and seed the table.
    pub fn build(self) -> SimResult<Sim<R>> {
        Sim::new(self.config, self.rng)
    }
}
