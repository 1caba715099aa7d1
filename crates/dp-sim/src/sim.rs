//! The `Sim` struct and its batch loop.

use dp_core::config::check_permissions;
use dp_core::{Phase, PhilosopherId, RandomSource, Side, StrategyKind, TableConfig, Tick};
use dp_events::{Event, EventKind, EventQueue};
use dp_strategy::{Admission, Strategy};
use dp_table::{DiningTable, Took};
use tracing::{debug, error, info, trace, warn};

use crate::{
    Lifecycle, NoopObserver, SimError, SimObserver, SimResult, SimStats, Snapshot, StepOutcome,
    Terminal, conflict, deadlock,
};

/// Delay before a refused or out-competed pickup is retried.
pub const RETRY_DELAY: u64 = 1;

/// Why processing stopped for good (until the next initialize).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Halt {
    Deadlock,
    /// An internal consistency error aborted a step.
    Fault,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The dining-philosophers engine.
///
/// One `Sim` owns the whole table: event queue (and clock), resource table,
/// philosopher records, statistics and the injected random source.  It only
/// moves when the caller invokes [`step`](Sim::step); pacing is external.
///
/// Each step processes one batch:
///
/// 1. **Pop** every event at the earliest pending time.
/// 2. **Resolve** simultaneous pickups of the same chopstick; losers wait and
///    retry after [`RETRY_DELAY`] with a higher priority.
/// 3. **Apply** the rest (releases, then hunger, then pickups).
/// 4. **Audit** chopstick exclusivity and conservation.
/// 5. **Detect** the circular wait and, if found, freeze the table.
///
/// Create via [`SimBuilder`][crate::SimBuilder] or [`Sim::new`].
pub struct Sim<R: RandomSource> {
    pub(crate) config:    TableConfig,
    pub(crate) strategy:  Strategy,
    pub(crate) table:     DiningTable,
    pub(crate) queue:     EventQueue,
    pub(crate) rng:       R,
    pub(crate) stats:     SimStats,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) halt:      Option<Halt>,
    pub(crate) snapshot:  Snapshot,
}

impl<R: RandomSource> Sim<R> {
    /// Validate `config` and seed a fresh table.
    pub fn new(config: TableConfig, rng: R) -> SimResult<Self> {
        config.validate()?;
        let strategy = Strategy::from_config(&config);
        let table = DiningTable::new(config.philosophers);
        let snapshot = Snapshot::capture(&table, config.strategy, Lifecycle::Idle, SimStats::default(), 0);
        let mut sim = Self {
            config,
            strategy,
            table,
            queue: EventQueue::new(),
            rng,
            stats: SimStats::default(),
            lifecycle: Lifecycle::Idle,
            halt: None,
            snapshot,
        };
        sim.reseed();
        Ok(sim)
    }

    // ── Configuration ─────────────────────────────────────────────────────

    /// Replace the configuration and random source and start over.
    ///
    /// On a configuration error nothing changes.
    pub fn initialize(&mut self, config: TableConfig, rng: R) -> SimResult<()> {
        config.validate()?;
        self.config = config;
        self.rng = rng;
        self.reseed();
        Ok(())
    }

    /// Start over with the current configuration, continuing the random source.
    pub fn reset(&mut self) {
        self.reseed();
    }

    /// Switch strategy by name.  Implies a reset.
    pub fn set_strategy(&mut self, name: &str) -> SimResult<()> {
        let kind: StrategyKind = name.parse()?;
        self.set_strategy_kind(kind)
    }

    /// Switch strategy.  Implies a reset.
    pub fn set_strategy_kind(&mut self, kind: StrategyKind) -> SimResult<()> {
        let config = TableConfig { strategy: kind, ..self.config.clone() };
        config.validate()?;
        self.config = config;
        self.reseed();
        info!(strategy = %kind, "strategy changed");
        Ok(())
    }

    /// Change the waiter's admission limit (`1 ≤ n < philosophers`).
    ///
    /// Takes effect from the next batch; the table is not reset.
    pub fn set_waiter_permissions(&mut self, permissions: usize) -> SimResult<()> {
        check_permissions(permissions, self.config.philosophers)?;
        self.config.waiter_permissions = Some(permissions);
        self.strategy = Strategy::from_config(&self.config);
        info!(permissions, "waiter permissions changed");
        Ok(())
    }

    /// Change the seat count.  Implies a reset.
    ///
    /// An explicit waiter limit survives only if it is still below the new
    /// count; otherwise the default (`n - 1`) applies.
    pub fn set_philosopher_count(&mut self, philosophers: usize) -> SimResult<()> {
        let waiter_permissions = self.config.waiter_permissions.filter(|&p| p < philosophers);
        let config = TableConfig { philosophers, waiter_permissions, ..self.config.clone() };
        config.validate()?;
        self.config = config;
        self.reseed();
        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Idle or Paused → Running.  Returns `false` if nothing changed.
    pub fn start(&mut self) -> bool {
        self.transition(&[Lifecycle::Idle, Lifecycle::Paused], Lifecycle::Running)
    }

    /// Running → Paused.
    pub fn pause(&mut self) -> bool {
        self.transition(&[Lifecycle::Running], Lifecycle::Paused)
    }

    /// Paused → Running.
    pub fn resume(&mut self) -> bool {
        self.transition(&[Lifecycle::Paused], Lifecycle::Running)
    }

    fn transition(&mut self, from: &[Lifecycle], to: Lifecycle) -> bool {
        if !from.contains(&self.lifecycle) {
            return false;
        }
        self.lifecycle = to;
        self.snapshot.lifecycle = to;
        true
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Process exactly one batch.
    pub fn step(&mut self) -> SimResult<StepOutcome> {
        self.step_with(&mut NoopObserver)
    }

    /// Process exactly one batch, reporting to `observer`.
    ///
    /// After deadlock every call returns the deadlock terminal without
    /// touching any state.  After an internal consistency error every call
    /// fails with [`SimError::Halted`] until the table is re-initialized.
    pub fn step_with<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StepOutcome> {
        match self.halt {
            Some(Halt::Fault)    => return Err(SimError::Halted),
            Some(Halt::Deadlock) => return Ok(StepOutcome::Finished(Terminal::Deadlock)),
            None => {}
        }

        let Some(batch) = self.queue.pop_next_batch() else {
            if self.lifecycle != Lifecycle::Stopped {
                self.stop();
                info!(time = %self.queue.now(), "event queue exhausted");
                observer.on_terminal(Terminal::Exhausted, &self.snapshot);
            }
            return Ok(StepOutcome::Finished(Terminal::Exhausted));
        };

        observer.on_batch_start(batch.time);
        match self.process_batch(batch.time, batch.events, observer) {
            Ok(true) => {
                observer.on_batch_end(&self.snapshot);
                observer.on_terminal(Terminal::Deadlock, &self.snapshot);
                Ok(StepOutcome::Finished(Terminal::Deadlock))
            }
            Ok(false) => {
                observer.on_batch_end(&self.snapshot);
                Ok(StepOutcome::Advanced(self.snapshot.clone()))
            }
            Err(e) => {
                error!(time = %batch.time, error = %e, "step aborted");
                self.halt = Some(Halt::Fault);
                self.stop();
                Err(e)
            }
        }
    }

    /// Step until a terminal outcome or `config.max_batches` batches.
    ///
    /// Returns `None` if the bound was hit first; the lifecycle is then
    /// Paused so a driver can continue.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Option<Terminal>> {
        self.run_batches(self.config.max_batches, observer)
    }

    /// Step at most `n` batches.  See [`run`](Sim::run).
    pub fn run_batches<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<Option<Terminal>> {
        self.start();
        for _ in 0..n {
            if let Some(terminal) = self.step_with(observer)?.terminal() {
                return Ok(Some(terminal));
            }
        }
        self.pause();
        Ok(None)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The state as of the last step (or initialize).
    #[inline] pub fn snapshot(&self) -> &Snapshot { &self.snapshot }
    #[inline] pub fn stats(&self) -> &SimStats { &self.stats }
    #[inline] pub fn lifecycle(&self) -> Lifecycle { self.lifecycle }
    #[inline] pub fn config(&self) -> &TableConfig { &self.config }
    #[inline] pub fn strategy(&self) -> &Strategy { &self.strategy }
    #[inline] pub fn table(&self) -> &DiningTable { &self.table }
    #[inline] pub fn queue(&self) -> &EventQueue { &self.queue }
    #[inline] pub fn now(&self) -> Tick { self.queue.now() }
    #[inline] pub fn is_deadlocked(&self) -> bool { self.stats.deadlock }

    // ── Core batch processing ─────────────────────────────────────────────

    /// Clear everything and schedule each philosopher's first END_THINKING.
    fn reseed(&mut self) {
        self.strategy = Strategy::from_config(&self.config);
        self.table = DiningTable::new(self.config.philosophers);
        self.queue.clear();
        self.stats = SimStats::default();
        self.lifecycle = Lifecycle::Idle;
        self.halt = None;

        for i in 0..self.config.philosophers {
            let ticks = self.rng.duration(Phase::Thinking, self.config.think_range);
            self.queue.schedule(ticks, EventKind::EndThinking, PhilosopherId(i as u32), 0);
        }
        self.refresh_snapshot();
        info!(
            philosophers = self.config.philosophers,
            strategy     = %self.config.strategy,
            permissions  = self.config.permissions(),
            "table initialized"
        );
    }

    /// Returns `Ok(true)` if this batch ended in deadlock.
    fn process_batch<O: SimObserver>(
        &mut self,
        now:      Tick,
        events:   Vec<Event>,
        observer: &mut O,
    ) -> SimResult<bool> {
        self.stats.time = now;
        self.stats.batches += 1;
        self.stats.events_processed += events.len() as u64;
        debug!(time = %now, events = events.len(), "batch");

        // ── Phase 1: resolve simultaneous requests ────────────────────────
        let resolution = conflict::resolve(now, events, &self.table, &self.strategy, &mut self.rng)?;
        for c in &resolution.conflicts {
            self.stats.conflicts += 1;
            debug!(time = %now, chopstick = %c.chopstick, winner = %c.winner, contenders = c.contenders.len(), "conflict");
            if c.fallback {
                self.stats.fallback_resolutions += 1;
                warn!(
                    strategy  = %self.strategy.kind(),
                    chopstick = %c.chopstick,
                    winner    = %c.winner,
                    "simultaneous requests under a deadlock-free strategy; first requester wins"
                );
            }
            observer.on_conflict(c);
        }

        // ── Phase 2: losers wait and retry with a higher priority ─────────
        for event in &resolution.losers {
            self.table.philosopher_mut(event.philosopher)?.lose_conflict(now)?;
            self.queue.schedule(RETRY_DELAY, event.kind, event.philosopher, event.priority.saturating_add(1));
            trace!(philosopher = %event.philosopher, kind = %event.kind, "lost conflict");
        }

        // ── Phase 3: apply ────────────────────────────────────────────────
        //
        // Releases go first so a chopstick put down this tick can be picked
        // up in the same tick.  The sort is stable: pickups keep batch order.
        let mut proceed = resolution.proceed;
        proceed.sort_by_key(|e| apply_rank(e.kind));
        for event in proceed {
            self.apply(event, now)?;
        }

        // ── Phase 4: audit ────────────────────────────────────────────────
        self.table.audit()?;

        // ── Phase 5: deadlock ─────────────────────────────────────────────
        let deadlocked = deadlock::detect(&self.table)?;
        if deadlocked {
            for p in self.table.philosophers_mut() {
                p.deadlock(now);
            }
            self.stats.deadlock = true;
            self.halt = Some(Halt::Deadlock);
            self.lifecycle = Lifecycle::Stopped;
            info!(time = %now, batches = self.stats.batches, "deadlock declared");
        }
        self.refresh_snapshot();
        Ok(deadlocked)
    }

    fn apply(&mut self, event: Event, now: Tick) -> SimResult<()> {
        let id = event.philosopher;
        trace!(time = %now, philosopher = %id, kind = %event.kind, "apply");
        match event.kind {
            EventKind::EndThinking => {
                self.table.philosopher_mut(id)?.finish_thinking(now)?;
                let side = self.strategy.first_side(self.table.philosopher(id)?);
                self.queue.schedule(0, EventKind::pickup(side), id, 0);
            }
            EventKind::PickupLeft  => self.pickup(event, Side::Left, now)?,
            EventKind::PickupRight => self.pickup(event, Side::Right, now)?,
            EventKind::EndEating => {
                self.table.finish_eating(id, now)?;
                let ticks = self.rng.duration(Phase::Thinking, self.config.think_range);
                self.queue.schedule(ticks, EventKind::EndThinking, id, 0);
            }
        }
        Ok(())
    }

    fn pickup(&mut self, event: Event, side: Side, now: Tick) -> SimResult<()> {
        let id = event.philosopher;
        match self.strategy.admits(&self.table, id, side)? {
            Admission::Granted => match self.table.take(id, side, now)? {
                Took::First => {
                    self.queue.schedule(0, EventKind::pickup(side.other()), id, 0);
                }
                Took::Both => {
                    let ticks = self.rng.duration(Phase::Eating, self.config.eat_range);
                    self.queue.schedule(ticks, EventKind::EndEating, id, 0);
                }
            },
            Admission::Busy { holder } => {
                self.table.philosopher_mut(id)?.wait(now)?;
                self.queue.schedule(RETRY_DELAY, event.kind, id, event.priority);
                trace!(philosopher = %id, %side, %holder, "chopstick busy");
            }
            Admission::Refused(reason) => {
                self.table.philosopher_mut(id)?.wait(now)?;
                self.queue.schedule(RETRY_DELAY, event.kind, id, event.priority);
                trace!(philosopher = %id, %side, %reason, "pickup refused");
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.lifecycle = Lifecycle::Stopped;
        self.snapshot.lifecycle = Lifecycle::Stopped;
    }

    fn refresh_snapshot(&mut self) {
        self.stats.time = self.queue.now();
        self.snapshot = Snapshot::capture(
            &self.table,
            self.config.strategy,
            self.lifecycle,
            self.stats,
            self.queue.len(),
        );
    }
}

/// Within a batch: releases, then hunger, then pickups.
fn apply_rank(kind: EventKind) -> u8 {
    match kind {
        EventKind::EndEating   => 0,
        EventKind::EndThinking => 1,
        EventKind::PickupLeft | EventKind::PickupRight => 2,
    }
}
