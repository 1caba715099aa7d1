//! The `Strategy` enum.

use dp_core::{PhilosopherId, RandomSource, Side, StrategyKind, TableConfig};
use dp_table::{DiningTable, Philosopher, TableResult};

use crate::{Admission, Contender, Refusal, Verdict};

/// A resource-acquisition and conflict-resolution rule set.
///
/// | Variant             | First side        | Extra gate                        | Tie-break              |
/// |---------------------|-------------------|-----------------------------------|------------------------|
/// | `Basic`             | left              | none                              | greatest id            |
/// | `Random`            | left              | none                              | uniform random         |
/// | `Waiter`            | left              | ≤ `permissions` holders           | first requester        |
/// | `ResourceHierarchy` | lower-numbered    | lower-numbered chopstick first    | first requester        |
///
/// Every tie-break first narrows the contenders to those with the highest
/// event priority, so a request that already lost once outranks fresh ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    Basic,
    Random,
    Waiter { permissions: usize },
    ResourceHierarchy,
}

impl Strategy {
    /// Build the strategy named in `config`.  Assumes `config` is validated.
    pub fn from_config(config: &TableConfig) -> Self {
        match config.strategy {
            StrategyKind::Basic             => Strategy::Basic,
            StrategyKind::Random            => Strategy::Random,
            StrategyKind::Waiter            => Strategy::Waiter { permissions: config.permissions() },
            StrategyKind::ResourceHierarchy => Strategy::ResourceHierarchy,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Basic             => StrategyKind::Basic,
            Strategy::Random            => StrategyKind::Random,
            Strategy::Waiter { .. }     => StrategyKind::Waiter,
            Strategy::ResourceHierarchy => StrategyKind::ResourceHierarchy,
        }
    }

    /// Which chopstick a philosopher who just became hungry reaches for.
    pub fn first_side(&self, philosopher: &Philosopher) -> Side {
        match self {
            Strategy::ResourceHierarchy => philosopher.lower_side(),
            Strategy::Basic | Strategy::Random | Strategy::Waiter { .. } => Side::Left,
        }
    }

    /// The acquisition gate: may `id` take its `side` chopstick now?
    pub fn admits(&self, table: &DiningTable, id: PhilosopherId, side: Side) -> TableResult<Admission> {
        let philosopher = table.philosopher(id)?;
        let chopstick = philosopher.chopstick(side);
        if let Some(holder) = table.chopsticks().holder(chopstick) {
            return Ok(Admission::Busy { holder });
        }

        let refusal = match *self {
            Strategy::Basic | Strategy::Random => None,

            // Holding anything means already admitted.
            Strategy::Waiter { permissions } => {
                let admitted = table.holders();
                (!philosopher.holds_any() && admitted >= permissions)
                    .then_some(Refusal::WaiterFull { admitted, permissions })
            }

            Strategy::ResourceHierarchy => {
                let lower = philosopher.lower_side();
                (side != lower && !philosopher.holds(lower))
                    .then(|| Refusal::OutOfOrder { lower: philosopher.chopstick(lower) })
            }
        };

        Ok(refusal.map_or(Admission::Granted, Admission::Refused))
    }

    /// Pick one winner among simultaneous requests for one chopstick.
    ///
    /// `contenders` must be in batch order (priority desc, then insertion).
    /// Returns `None` only for an empty slice.
    pub fn pick_winner<R>(&self, contenders: &[Contender], rng: &mut R) -> Option<Verdict>
    where
        R: RandomSource + ?Sized,
    {
        let top = contenders.iter().map(|c| c.priority).max()?;
        let eligible: Vec<usize> = contenders
            .iter()
            .enumerate()
            .filter(|(_, c)| c.priority == top)
            .map(|(i, _)| i)
            .collect();

        let verdict = match self {
            // Rightmost seat wins; ties on id keep the earlier request.
            Strategy::Basic => {
                let winner = eligible
                    .iter()
                    .copied()
                    .reduce(|best, i| {
                        if contenders[i].philosopher > contenders[best].philosopher { i } else { best }
                    })?;
                Verdict { winner, fallback: false }
            }
            Strategy::Random => Verdict {
                winner:   eligible[rng.pick(eligible.len()) % eligible.len()],
                fallback: false,
            },
            Strategy::Waiter { .. } | Strategy::ResourceHierarchy => Verdict {
                winner:   eligible[0],
                fallback: true,
            },
        };
        Some(verdict)
    }
}
