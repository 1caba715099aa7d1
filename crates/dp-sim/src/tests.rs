//! Unit tests for dp-sim.

use dp_core::{
    ChopstickId, DpError, DurationRange, PhilosopherId, RandomSource, ScriptedSource, SimRng,
    StrategyKind, TableConfig, Tick,
};
use dp_events::EventKind;
use dp_strategy::Strategy;
use dp_table::PhilosopherState;

use crate::{
    Conflict, Lifecycle, NoopObserver, Sim, SimBuilder, SimError, SimObserver, SimStats, Snapshot,
    StepOutcome, Terminal,
};

fn p(i: u32) -> PhilosopherId {
    PhilosopherId(i)
}

fn c(i: u32) -> ChopstickId {
    ChopstickId(i)
}

/// Five seats, every duration equal to `ticks`.
fn scripted(kind: StrategyKind, ticks: u64) -> Sim<ScriptedSource> {
    SimBuilder::new(ScriptedSource::constant(ticks)).strategy(kind).build().unwrap()
}

/// Empty the queue and make `hungry` finish thinking at tick 0, so a test
/// can schedule exactly the pickups it wants.
fn staged(kind: StrategyKind, hungry: &[u32]) -> Sim<ScriptedSource> {
    let mut sim = scripted(kind, 5);
    sim.queue.clear();
    for &i in hungry {
        sim.table.philosopher_mut(p(i)).unwrap().finish_thinking(Tick::ZERO).unwrap();
    }
    sim
}

fn advanced(outcome: StepOutcome) -> Snapshot {
    match outcome {
        StepOutcome::Advanced(s) => s,
        other => panic!("expected a processed batch, got {other:?}"),
    }
}

#[derive(Default)]
struct Recorder {
    starts:    Vec<Tick>,
    conflicts: Vec<Conflict>,
    ends:      usize,
    terminals: Vec<Terminal>,
}

impl SimObserver for Recorder {
    fn on_batch_start(&mut self, time: Tick) {
        self.starts.push(time);
    }
    fn on_conflict(&mut self, conflict: &Conflict) {
        self.conflicts.push(conflict.clone());
    }
    fn on_batch_end(&mut self, _snapshot: &Snapshot) {
        self.ends += 1;
    }
    fn on_terminal(&mut self, terminal: Terminal, _snapshot: &Snapshot) {
        self.terminals.push(terminal);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn defaults_seed_one_end_thinking_each() {
        let sim = scripted(StrategyKind::Basic, 4);
        assert_eq!(sim.table().seats(), 5);
        assert_eq!(sim.queue().len(), 5);
        assert_eq!(sim.queue().next_time(), Some(Tick(4)));
        for i in 0..5 {
            let pending = sim.queue().pending_for(p(i));
            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].kind, EventKind::EndThinking);
        }
        assert_eq!(sim.lifecycle(), Lifecycle::Idle);
        assert_eq!(*sim.stats(), SimStats::default());
    }

    #[test]
    fn rejects_too_few_philosophers() {
        let r = SimBuilder::new(ScriptedSource::constant(1)).philosophers(1).build();
        assert!(matches!(r, Err(SimError::Config(DpError::TooFewPhilosophers(1)))));
    }

    #[test]
    fn rejects_permissions_at_seat_count() {
        let r = SimBuilder::new(ScriptedSource::constant(1))
            .strategy(StrategyKind::Waiter)
            .waiter_permissions(5)
            .build();
        assert!(r.is_err_and(|e| e.is_config()));
    }

    #[test]
    fn rejects_zero_duration() {
        let r = SimBuilder::new(ScriptedSource::constant(1))
            .think_range(DurationRange::new(0, 3))
            .build();
        assert!(r.is_err_and(|e| e.is_config()));
    }

    #[test]
    fn carries_waiter_permissions() {
        let sim = SimBuilder::new(SimRng::new(1))
            .philosophers(7)
            .strategy(StrategyKind::Waiter)
            .waiter_permissions(3)
            .max_batches(50)
            .build()
            .unwrap();
        assert_eq!(*sim.strategy(), Strategy::Waiter { permissions: 3 });
        assert_eq!(sim.config().max_batches, 50);
    }
}

// ── Deadlock ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod deadlock {
    use super::*;

    #[test]
    fn basic_reaches_deadlock_with_unit_think_time() {
        let mut sim = scripted(StrategyKind::Basic, 1);

        // T1: everyone stops thinking.
        let s = advanced(sim.step().unwrap());
        assert_eq!(s.time(), Tick(1));
        assert!(s.philosophers.iter().all(|p| p.state() == PhilosopherState::Hungry));

        // T1 again: five left pickups on five different chopsticks.
        let s = advanced(sim.step().unwrap());
        assert_eq!(s.time(), Tick(1));
        assert!(s.philosophers.iter().all(|p| p.has_left() && !p.has_right()));
        assert_eq!(s.available_chopsticks(), 0);

        // T1 again: every right chopstick is busy.
        assert_eq!(sim.step().unwrap(), StepOutcome::Finished(Terminal::Deadlock));
        assert!(sim.is_deadlocked());
        assert_eq!(sim.stats().batches, 3);
        assert_eq!(sim.stats().conflicts, 0);
        assert_eq!(sim.lifecycle(), Lifecycle::Stopped);
        assert!(sim.snapshot().philosophers.iter().all(|p| p.state() == PhilosopherState::Deadlock));
    }

    #[test]
    fn deadlock_is_sticky() {
        let mut sim = scripted(StrategyKind::Basic, 1);
        assert_eq!(sim.run(&mut NoopObserver).unwrap(), Some(Terminal::Deadlock));

        let frozen = sim.snapshot().clone();
        let pending = sim.queue().len();
        for _ in 0..5 {
            assert_eq!(sim.step().unwrap(), StepOutcome::Finished(Terminal::Deadlock));
        }
        assert_eq!(*sim.snapshot(), frozen);
        assert_eq!(sim.queue().len(), pending);
        assert_eq!(sim.now(), Tick(1));
    }

    #[test]
    fn simultaneous_hunger_at_three() {
        let mut sim = scripted(StrategyKind::Basic, 3);

        let s = advanced(sim.step().unwrap());
        assert_eq!(s.time(), Tick(3));
        assert_eq!(s.stats.events_processed, 5);
        assert_eq!(sim.queue().next_time(), Some(Tick(3)));

        // Left pickups target distinct chopsticks, so nothing is contested.
        let s = advanced(sim.step().unwrap());
        assert_eq!(s.time(), Tick(3));
        assert_eq!(s.stats.conflicts, 0);
        assert!(s.philosophers.iter().all(|p| p.has_left()));

        assert_eq!(sim.step().unwrap().terminal(), Some(Terminal::Deadlock));
        for i in 0..5 {
            let retry = sim.queue().pending_for(p(i));
            assert_eq!(retry.len(), 1);
            assert_eq!(retry[0].fire_time, Tick(4));
            assert_eq!(retry[0].kind, EventKind::PickupRight);
        }
    }

    #[test]
    fn reports_terminal_once() {
        let mut sim = scripted(StrategyKind::Basic, 1);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        sim.step_with(&mut rec).unwrap();
        assert_eq!(rec.terminals, vec![Terminal::Deadlock]);
        assert_eq!(rec.starts, vec![Tick(1); 3]);
        assert_eq!(rec.ends, 3);
    }
}

// ── Conflict resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod conflicts {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn basic_greater_id_wins() {
        let mut sim = staged(StrategyKind::Basic, &[0, 1]);
        // Both want chopstick 1: philosopher 0 as its right, 1 as its left.
        sim.queue.schedule(0, EventKind::PickupRight, p(0), 0);
        sim.queue.schedule(0, EventKind::PickupLeft, p(1), 0);

        let mut rec = Recorder::default();
        advanced(sim.step_with(&mut rec).unwrap());

        assert_eq!(sim.stats().conflicts, 1);
        assert_eq!(rec.conflicts.len(), 1);
        assert_eq!(rec.conflicts[0].chopstick, c(1));
        assert_eq!(rec.conflicts[0].winner, p(1));
        assert!(!rec.conflicts[0].fallback);
        assert_eq!(sim.table().chopsticks().holder(c(1)), Some(p(1)));

        let loser = sim.table().philosopher(p(0)).unwrap();
        assert_eq!(loser.state(), PhilosopherState::Waiting);
        assert_eq!(loser.stats().waiting_count, 1);

        let retry = sim.queue().pending_for(p(0));
        assert_eq!(retry.len(), 1);
        assert_eq!(retry[0].kind, EventKind::PickupRight);
        assert_eq!(retry[0].fire_time, Tick(1));
        assert_eq!(retry[0].priority, 1);
    }

    #[test]
    fn one_conflict_per_contested_chopstick() {
        let mut sim = staged(StrategyKind::Basic, &[0, 1, 2, 3]);
        sim.queue.schedule(0, EventKind::PickupRight, p(0), 0);
        sim.queue.schedule(0, EventKind::PickupLeft, p(1), 0);
        sim.queue.schedule(0, EventKind::PickupRight, p(2), 0);
        sim.queue.schedule(0, EventKind::PickupLeft, p(3), 0);

        sim.step().unwrap();
        assert_eq!(sim.stats().conflicts, 2);
        assert_eq!(sim.table().chopsticks().holder(c(1)), Some(p(1)));
        assert_eq!(sim.table().chopsticks().holder(c(3)), Some(p(3)));
    }

    #[test]
    fn retry_priority_beats_greater_id() {
        let mut sim = staged(StrategyKind::Basic, &[0, 1]);
        // Philosopher 0 already lost once and carries the bumped priority.
        sim.queue.schedule(0, EventKind::PickupRight, p(0), 1);
        sim.queue.schedule(0, EventKind::PickupLeft, p(1), 0);

        let mut rec = Recorder::default();
        sim.step_with(&mut rec).unwrap();
        assert_eq!(rec.conflicts[0].winner, p(0));
        assert_eq!(sim.table().chopsticks().holder(c(1)), Some(p(0)));
    }

    #[test]
    fn random_uses_injected_pick() {
        let mut sim = staged(StrategyKind::Random, &[0, 1]);
        sim.rng = ScriptedSource::constant(5).with_picks(vec![0]);
        sim.queue.schedule(0, EventKind::PickupRight, p(0), 0);
        sim.queue.schedule(0, EventKind::PickupLeft, p(1), 0);

        sim.step().unwrap();
        assert_eq!(sim.table().chopsticks().holder(c(1)), Some(p(0)));
        assert_eq!(sim.table().philosopher(p(1)).unwrap().state(), PhilosopherState::Waiting);
    }

    #[test]
    #[traced_test]
    fn hierarchy_falls_back_to_first_requester() {
        // Philosophers 0 and 4 both start with chopstick 0.
        let mut sim = scripted(StrategyKind::ResourceHierarchy, 1);
        let mut rec = Recorder::default();
        sim.step_with(&mut rec).unwrap();
        sim.step_with(&mut rec).unwrap();

        assert_eq!(sim.stats().conflicts, 1);
        assert_eq!(sim.stats().fallback_resolutions, 1);
        assert_eq!(rec.conflicts[0].chopstick, c(0));
        assert_eq!(rec.conflicts[0].winner, p(0));
        assert!(rec.conflicts[0].fallback);
        assert!(logs_contain("first requester wins"));

        let retry = sim.queue().pending_for(p(4));
        assert_eq!(retry[0].kind, EventKind::PickupRight);
        assert_eq!(retry[0].priority, 1);
    }
}

// ── Strategies ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod strategies {
    use super::*;

    #[test]
    fn waiter_turns_away_the_fifth() {
        let mut sim = scripted(StrategyKind::Waiter, 1);
        sim.step().unwrap();
        let s = advanced(sim.step().unwrap());

        assert_eq!(s.available_chopsticks(), 1);
        let fifth = &s.philosophers[4];
        assert_eq!(fifth.state(), PhilosopherState::Waiting);
        assert!(!fifth.holds_any());

        // Philosopher 3 is exempt for its right chopstick and eats.
        let s = advanced(sim.step().unwrap());
        assert_eq!(s.philosophers[3].state(), PhilosopherState::Eating);
        assert!(!sim.is_deadlocked());
    }

    #[test]
    fn hierarchy_last_seat_takes_right_first() {
        let mut sim = scripted(StrategyKind::ResourceHierarchy, 1);
        sim.step().unwrap();
        let pending = sim.queue().pending_for(p(4));
        assert_eq!(pending[0].kind, EventKind::PickupRight);
        let pending = sim.queue().pending_for(p(2));
        assert_eq!(pending[0].kind, EventKind::PickupLeft);
    }

    #[test]
    fn waiter_never_deadlocks() {
        for seed in 0..4 {
            let mut sim = SimBuilder::new(SimRng::new(seed))
                .strategy(StrategyKind::Waiter)
                .waiter_permissions(4)
                .build()
                .unwrap();
            assert_eq!(sim.run_batches(10_000, &mut NoopObserver).unwrap(), None, "seed {seed}");
            assert!(!sim.is_deadlocked());
            assert_eq!(sim.stats().batches, 10_000);
        }
    }

    #[test]
    fn hierarchy_never_deadlocks() {
        for seed in 0..4 {
            let mut sim = SimBuilder::new(SimRng::new(seed))
                .strategy(StrategyKind::ResourceHierarchy)
                .build()
                .unwrap();
            assert_eq!(sim.run_batches(10_000, &mut NoopObserver).unwrap(), None, "seed {seed}");
            assert!(!sim.is_deadlocked());
            let meals: u64 = sim.table().philosophers().iter().map(|p| p.stats().meals).sum();
            assert!(meals > 0);
        }
    }

    #[test]
    fn hierarchy_survives_unit_think_time() {
        let mut sim = scripted(StrategyKind::ResourceHierarchy, 1);
        assert_eq!(sim.run_batches(500, &mut NoopObserver).unwrap(), None);
        assert!(!sim.is_deadlocked());
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod controller {
    use super::*;

    #[test]
    fn reset_twice_is_identical() {
        let mut sim = scripted(StrategyKind::Basic, 2);
        sim.run_batches(4, &mut NoopObserver).unwrap();

        let cfg = sim.config().clone();
        sim.initialize(cfg.clone(), ScriptedSource::constant(2)).unwrap();
        let first = sim.snapshot().clone();
        let first_queue: Vec<_> = (0..5).flat_map(|i| sim.queue().pending_for(p(i))).collect();

        sim.initialize(cfg, ScriptedSource::constant(2)).unwrap();
        let second_queue: Vec<_> = (0..5).flat_map(|i| sim.queue().pending_for(p(i))).collect();

        assert_eq!(*sim.snapshot(), first);
        assert_eq!(second_queue, first_queue);
        assert_eq!(*sim.stats(), SimStats::default());
        assert_eq!(sim.now(), Tick::ZERO);
    }

    #[test]
    fn reset_clears_deadlock() {
        let mut sim = scripted(StrategyKind::Basic, 1);
        sim.run(&mut NoopObserver).unwrap();
        sim.reset();
        assert!(!sim.is_deadlocked());
        assert_eq!(sim.lifecycle(), Lifecycle::Idle);
        assert!(matches!(sim.step().unwrap(), StepOutcome::Advanced(_)));
    }

    #[test]
    fn unknown_strategy_leaves_state_alone() {
        let mut sim = scripted(StrategyKind::Basic, 1);
        sim.step().unwrap();
        let before = sim.snapshot().clone();

        let err = sim.set_strategy("dijkstra").unwrap_err();
        assert!(err.is_config());
        assert_eq!(*sim.snapshot(), before);
        assert_eq!(sim.config().strategy, StrategyKind::Basic);
    }

    #[test]
    fn set_strategy_resets() {
        let mut sim = scripted(StrategyKind::Basic, 1);
        sim.step().unwrap();
        sim.set_strategy("Resource-Hierarchy").unwrap();
        assert_eq!(sim.strategy().kind(), StrategyKind::ResourceHierarchy);
        assert_eq!(sim.stats().batches, 0);
        assert_eq!(sim.queue().len(), 5);
    }

    #[test]
    fn waiter_permissions_range() {
        let mut sim = scripted(StrategyKind::Waiter, 1);
        assert!(sim.set_waiter_permissions(0).is_err_and(|e| e.is_config()));
        assert!(sim.set_waiter_permissions(5).is_err_and(|e| e.is_config()));
        assert_eq!(*sim.strategy(), Strategy::Waiter { permissions: 4 });

        sim.step().unwrap();
        sim.set_waiter_permissions(2).unwrap();
        assert_eq!(*sim.strategy(), Strategy::Waiter { permissions: 2 });
        assert_eq!(sim.stats().batches, 1);
    }

    #[test]
    fn philosopher_count() {
        let mut sim = scripted(StrategyKind::Waiter, 1);
        sim.set_waiter_permissions(3).unwrap();
        assert!(sim.set_philosopher_count(1).is_err());
        assert_eq!(sim.table().seats(), 5);

        sim.set_philosopher_count(7).unwrap();
        assert_eq!(sim.table().seats(), 7);
        assert_eq!(sim.queue().len(), 7);
        assert_eq!(sim.config().permissions(), 3);

        sim.set_philosopher_count(3).unwrap();
        assert_eq!(sim.config().permissions(), 2);
    }

    #[test]
    fn lifecycle_transitions() {
        let mut sim = scripted(StrategyKind::Basic, 1);
        assert_eq!(sim.lifecycle(), Lifecycle::Idle);
        assert!(!sim.pause());
        assert!(sim.start());
        assert_eq!(sim.snapshot().lifecycle, Lifecycle::Running);
        assert!(sim.pause());
        assert!(!sim.pause());
        assert!(sim.resume());
        assert_eq!(sim.lifecycle(), Lifecycle::Running);

        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.lifecycle(), Lifecycle::Stopped);
        assert!(!sim.start());
    }

    #[test]
    fn bounded_run_pauses() {
        let mut sim = scripted(StrategyKind::ResourceHierarchy, 2);
        assert_eq!(sim.run_batches(3, &mut NoopObserver).unwrap(), None);
        assert_eq!(sim.lifecycle(), Lifecycle::Paused);
        assert_eq!(sim.stats().batches, 3);
    }

    #[test]
    fn empty_queue_is_exhausted() {
        let mut sim = scripted(StrategyKind::Basic, 1);
        sim.queue.clear();
        let mut rec = Recorder::default();
        assert_eq!(sim.step_with(&mut rec).unwrap(), StepOutcome::Finished(Terminal::Exhausted));
        assert_eq!(sim.step_with(&mut rec).unwrap(), StepOutcome::Finished(Terminal::Exhausted));
        assert_eq!(rec.terminals, vec![Terminal::Exhausted]);
        assert_eq!(sim.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn consistency_error_halts_until_reset() {
        let mut sim = staged(StrategyKind::Basic, &[0]);
        // END_EATING for a philosopher who is only hungry.
        sim.queue.schedule(0, EventKind::EndEating, p(0), 0);

        let err = sim.step().unwrap_err();
        assert!(matches!(err, SimError::Table(_)));
        assert!(!err.is_config());
        assert!(matches!(sim.step(), Err(SimError::Halted)));
        assert_eq!(sim.lifecycle(), Lifecycle::Stopped);

        sim.reset();
        assert!(sim.step().is_ok());
    }

    #[test]
    fn initialize_rejects_bad_config() {
        let mut sim = scripted(StrategyKind::Basic, 1);
        let bad = TableConfig { philosophers: 0, ..TableConfig::default() };
        assert!(sim.initialize(bad, ScriptedSource::constant(1)).is_err());
        assert_eq!(sim.table().seats(), 5);
    }
}

// ── Invariants ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod invariants {
    use super::*;
    use proptest::prelude::*;

    fn check_table<R: RandomSource>(sim: &Sim<R>) {
        let table = sim.table();
        let flags: usize = table
            .philosophers()
            .iter()
            .map(|p| p.has_left() as usize + p.has_right() as usize)
            .sum();
        assert_eq!(table.chopsticks().held_count(), flags);

        for chopstick in table.chopsticks().iter() {
            let claimants = table
                .philosophers()
                .iter()
                .filter(|p| p.holds_chopstick(chopstick.id))
                .count();
            assert!(claimants <= 1);
            assert_eq!(claimants == 1, chopstick.held_by.is_some());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn exclusivity_and_conservation(
            seed in any::<u64>(),
            seats in 2usize..8,
            kind in prop::sample::select(StrategyKind::ALL.to_vec()),
        ) {
            let mut sim = SimBuilder::new(SimRng::new(seed))
                .philosophers(seats)
                .strategy(kind)
                .build()
                .unwrap();
            for _ in 0..300 {
                let outcome = sim.step().unwrap();
                check_table(&sim);
                if outcome.terminal().is_some() {
                    break;
                }
            }
            prop_assert!(kind == StrategyKind::Basic || kind == StrategyKind::Random || !sim.is_deadlocked());
        }
    }
}
