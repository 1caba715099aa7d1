//! `DiningTable`: philosophers and chopsticks kept in step.
//!
//! # Why one struct?
//!
//! A philosopher's `has_left`/`has_right` flags and the resource table's
//! holder field describe the same fact from two sides.  Routing every
//! ownership change through [`DiningTable::take`] and
//! [`DiningTable::finish_eating`] updates both in one call, and
//! [`DiningTable::audit`] re-derives one from the other after each batch.

use dp_core::{PhilosopherId, Side, Tick};

use crate::{Philosopher, ResourceTable, TableError, TableResult, Took};

pub struct DiningTable {
    philosophers: Vec<Philosopher>,
    chopsticks:   ResourceTable,
}

impl DiningTable {
    /// `seats` thinking philosophers and `seats` free chopsticks.
    pub fn new(seats: usize) -> Self {
        let philosophers = (0..seats as u32)
            .map(|i| Philosopher::new(PhilosopherId(i), seats))
            .collect();
        Self { philosophers, chopsticks: ResourceTable::new(seats) }
    }

    #[inline]
    pub fn seats(&self) -> usize {
        self.philosophers.len()
    }

    pub fn philosopher(&self, id: PhilosopherId) -> TableResult<&Philosopher> {
        self.philosophers
            .get(id.index())
            .ok_or(TableError::UnknownPhilosopher(id))
    }

    pub fn philosopher_mut(&mut self, id: PhilosopherId) -> TableResult<&mut Philosopher> {
        self.philosophers
            .get_mut(id.index())
            .ok_or(TableError::UnknownPhilosopher(id))
    }

    /// All philosophers in seat order.
    pub fn philosophers(&self) -> &[Philosopher] {
        &self.philosophers
    }

    /// Mutable iterator for whole-table transitions (deadlock declaration).
    pub fn philosophers_mut(&mut self) -> impl Iterator<Item = &mut Philosopher> + '_ {
        self.philosophers.iter_mut()
    }

    pub fn chopsticks(&self) -> &ResourceTable {
        &self.chopsticks
    }

    /// Number of philosophers holding at least one chopstick.
    pub fn holders(&self) -> usize {
        self.philosophers.iter().filter(|p| p.holds_any()).count()
    }

    /// Acquire `id`'s `side` chopstick.  Fails if it is not available.
    pub fn take(&mut self, id: PhilosopherId, side: Side, now: Tick) -> TableResult<Took> {
        let chopstick = self.philosopher(id)?.chopstick(side);
        self.chopsticks.acquire(chopstick, id)?;
        self.philosopher_mut(id)?.take(side, now)
    }

    /// END_EATING: release both chopsticks and return to THINKING.
    pub fn finish_eating(&mut self, id: PhilosopherId, now: Tick) -> TableResult<()> {
        let (left, right) = {
            let p = self.philosopher_mut(id)?;
            p.finish_eating(now)?;
            (p.left(), p.right())
        };
        for chopstick in [left, right] {
            let holder = self.chopsticks.release(chopstick)?;
            if holder != id {
                return Err(TableError::FlagMismatch { chopstick, philosopher: id, holder: Some(holder) });
            }
        }
        Ok(())
    }

    /// Check exclusivity and conservation: every held chopstick has exactly
    /// one matching `has_*` flag, and every set flag points at a chopstick
    /// held by its owner.
    pub fn audit(&self) -> TableResult<()> {
        for p in &self.philosophers {
            for side in [Side::Left, Side::Right] {
                let chopstick = p.chopstick(side);
                let holder = self.chopsticks.holder(chopstick);
                if p.holds(side) != (holder == Some(p.id())) {
                    return Err(TableError::FlagMismatch { chopstick, philosopher: p.id(), holder });
                }
            }
        }
        for c in self.chopsticks.iter() {
            if let Some(holder) = c.held_by {
                let owner = self.philosopher(holder)?;
                if !owner.holds_chopstick(c.id) {
                    return Err(TableError::FlagMismatch {
                        chopstick:   c.id,
                        philosopher: holder,
                        holder:      Some(holder),
                    });
                }
            }
        }
        Ok(())
    }
}
