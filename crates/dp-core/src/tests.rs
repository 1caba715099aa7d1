//! Unit tests for dp-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ChopstickId, PhilosopherId, Side};

    #[test]
    fn index_roundtrip() {
        let id = PhilosopherId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(PhilosopherId::try_from(3usize).unwrap(), id);
    }

    #[test]
    fn left_is_own_index_right_wraps() {
        assert_eq!(PhilosopherId(0).chopstick(Side::Left, 5), ChopstickId(0));
        assert_eq!(PhilosopherId(0).chopstick(Side::Right, 5), ChopstickId(1));
        assert_eq!(PhilosopherId(4).chopstick(Side::Left, 5), ChopstickId(4));
        assert_eq!(PhilosopherId(4).chopstick(Side::Right, 5), ChopstickId(0));
    }

    #[test]
    fn two_seat_table_shares_both_chopsticks() {
        assert_eq!(PhilosopherId(0).chopstick(Side::Right, 2), ChopstickId(1));
        assert_eq!(PhilosopherId(1).chopstick(Side::Right, 2), ChopstickId(0));
    }

    #[test]
    fn side_other() {
        assert_eq!(Side::Left.other(), Side::Right);
        assert_eq!(Side::Right.other(), Side::Left);
    }

    #[test]
    fn display() {
        assert_eq!(PhilosopherId(7).to_string(), "PhilosopherId(7)");
        assert_eq!(ChopstickId(2).to_string(), "ChopstickId(2)");
        assert_eq!(Side::Right.to_string(), "right");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(7)), 0);
    }

    #[test]
    fn clock_only_moves_forward() {
        let mut clock = SimClock::new();
        clock.advance_to(Tick(4));
        assert_eq!(clock.now(), Tick(4));
        clock.advance_to(Tick(2));
        assert_eq!(clock.now(), Tick(4));
        assert_eq!(clock.after(3), Tick(7));
        assert_eq!(clock.to_string(), "T4");
    }
}

#[cfg(test)]
mod config {
    use crate::{DpError, DurationRange, StrategyKind, TableConfig};

    #[test]
    fn defaults_are_five_seats_basic() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.philosophers, 5);
        assert_eq!(cfg.strategy, StrategyKind::Basic);
        assert_eq!(cfg.permissions(), 4);
        assert_eq!(cfg.think_range, DurationRange::new(1, 10));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn strategy_names_parse_case_insensitively() {
        assert_eq!("Basic".parse::<StrategyKind>().unwrap(), StrategyKind::Basic);
        assert_eq!("RANDOM".parse::<StrategyKind>().unwrap(), StrategyKind::Random);
        assert_eq!(" waiter ".parse::<StrategyKind>().unwrap(), StrategyKind::Waiter);
        assert_eq!(
            "resource-hierarchy".parse::<StrategyKind>().unwrap(),
            StrategyKind::ResourceHierarchy,
        );
        assert_eq!("hierarchy".parse::<StrategyKind>().unwrap(), StrategyKind::ResourceHierarchy);
    }

    #[test]
    fn unknown_strategy_is_config_error() {
        let err = "banker".parse::<StrategyKind>().unwrap_err();
        assert_eq!(err, DpError::UnknownStrategy("banker".into()));
    }

    #[test]
    fn display_round_trips() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn too_few_philosophers() {
        let cfg = TableConfig::new(1, StrategyKind::Basic);
        assert_eq!(cfg.validate(), Err(DpError::TooFewPhilosophers(1)));
    }

    #[test]
    fn waiter_permissions_bounds() {
        let mut cfg = TableConfig::new(5, StrategyKind::Waiter);
        cfg.waiter_permissions = Some(0);
        assert!(matches!(cfg.validate(), Err(DpError::WaiterPermissions { .. })));
        cfg.waiter_permissions = Some(5);
        assert!(matches!(cfg.validate(), Err(DpError::WaiterPermissions { .. })));
        cfg.waiter_permissions = Some(1);
        assert!(cfg.validate().is_ok());
        cfg.waiter_permissions = Some(4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_or_inverted_ranges_rejected() {
        let mut cfg = TableConfig::default();
        cfg.eat_range = DurationRange::new(0, 3);
        assert!(matches!(cfg.validate(), Err(DpError::DurationRange { what: "eating", .. })));
        cfg.eat_range = DurationRange::new(4, 2);
        assert!(cfg.validate().is_err());
        cfg.eat_range = DurationRange::fixed(2);
        assert!(cfg.validate().is_ok());
    }
}

#[cfg(test)]
mod rng {
    use crate::{DurationRange, Phase, RandomSource, ScriptedSource, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let range = DurationRange::default();
            assert_eq!(r1.duration(Phase::Thinking, range), r2.duration(Phase::Thinking, range));
            assert_eq!(r1.pick(5), r2.pick(5));
        }
    }

    #[test]
    fn durations_stay_in_range() {
        let mut rng = SimRng::new(0);
        let range = DurationRange::new(1, 10);
        let mut seen = [false; 11];
        for _ in 0..2_000 {
            let d = rng.duration(Phase::Eating, range);
            assert!(range.contains(d), "got {d}");
            seen[d as usize] = true;
        }
        assert!(seen[1..=10].iter().all(|&s| s), "every value in [1, 10] is reachable");
    }

    #[test]
    fn picks_stay_in_bounds() {
        let mut rng = SimRng::new(7);
        for _ in 0..1_000 {
            assert!(rng.pick(3) < 3);
        }
    }

    #[test]
    fn scripted_cycles() {
        let mut src = ScriptedSource::new(vec![3, 1]).with_picks(vec![4]);
        let r = DurationRange::default();
        assert_eq!(src.duration(Phase::Thinking, r), 3);
        assert_eq!(src.duration(Phase::Eating, r), 1);
        assert_eq!(src.duration(Phase::Thinking, r), 3);
        assert_eq!(src.pick(3), 1);
    }

    #[test]
    fn scripted_defaults() {
        let mut src = ScriptedSource::new(vec![]);
        assert_eq!(src.duration(Phase::Thinking, DurationRange::default()), 1);
        assert_eq!(src.pick(9), 0);
        assert_eq!(ScriptedSource::constant(4).duration(Phase::Eating, DurationRange::default()), 4);
    }
}
