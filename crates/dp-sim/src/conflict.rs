//! Simultaneous-request resolution.
//!
//! Pickup events in one batch are grouped by the physical chopstick they
//! target.  Any chopstick wanted by two or more requests is a conflict: the
//! strategy picks one winner and every other request for that chopstick is a
//! loser.  Losers never reach the acquisition gate in this batch.

use std::collections::BTreeMap;

use dp_core::{ChopstickId, PhilosopherId, RandomSource, Side, Tick};
use dp_events::Event;
use dp_strategy::{Contender, Strategy};
use dp_table::DiningTable;

use crate::SimResult;

/// One contested chopstick and how it was decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub time:       Tick,
    pub chopstick:  ChopstickId,
    /// Every request for the chopstick, in batch order.
    pub contenders: Vec<Contender>,
    pub winner:     PhilosopherId,
    /// The strategy fell back to first-requester-wins.
    pub fallback:   bool,
}

/// A batch split into events that go on to normal processing and losers
/// that must be retried.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Uncontested events plus conflict winners, in batch order.
    pub proceed:   Vec<Event>,
    pub losers:    Vec<Event>,
    pub conflicts: Vec<Conflict>,
}

/// Split `events` (one batch, in batch order) into winners and losers.
pub fn resolve<R>(
    time:     Tick,
    events:   Vec<Event>,
    table:    &DiningTable,
    strategy: &Strategy,
    rng:      &mut R,
) -> SimResult<Resolution>
where
    R: RandomSource + ?Sized,
{
    // Chopstick → (event index, side) of every pickup targeting it.  BTreeMap
    // keeps the conflict order (and therefore random draws) deterministic.
    let mut wanted: BTreeMap<ChopstickId, Vec<(usize, Side)>> = BTreeMap::new();
    for (i, event) in events.iter().enumerate() {
        if let Some(side) = event.kind.pickup_side() {
            let chopstick = table.philosopher(event.philosopher)?.chopstick(side);
            wanted.entry(chopstick).or_default().push((i, side));
        }
    }

    let mut lost = vec![false; events.len()];
    let mut conflicts = Vec::new();
    for (chopstick, requests) in wanted {
        if requests.len() < 2 {
            continue;
        }
        let contenders: Vec<Contender> = requests
            .iter()
            .map(|&(i, side)| Contender {
                philosopher: events[i].philosopher,
                side,
                priority:    events[i].priority,
            })
            .collect();
        let Some(verdict) = strategy.pick_winner(&contenders, rng) else {
            continue;
        };
        for (k, &(i, _)) in requests.iter().enumerate() {
            if k != verdict.winner {
                lost[i] = true;
            }
        }
        conflicts.push(Conflict {
            time,
            chopstick,
            winner: contenders[verdict.winner].philosopher,
            contenders,
            fallback: verdict.fallback,
        });
    }

    let mut resolution = Resolution { conflicts, ..Resolution::default() };
    for (event, lost) in events.into_iter().zip(lost) {
        if lost {
            resolution.losers.push(event);
        } else {
            resolution.proceed.push(event);
        }
    }
    Ok(resolution)
}
