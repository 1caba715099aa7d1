//! The resource table: one slot per chopstick.

use dp_core::{ChopstickId, PhilosopherId};

use crate::{TableError, TableResult};

/// A single chopstick.  Available exactly when nobody holds it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chopstick {
    pub id:      ChopstickId,
    pub held_by: Option<PhilosopherId>,
}

impl Chopstick {
    #[inline]
    pub fn is_available(&self) -> bool {
        self.held_by.is_none()
    }
}

/// Availability and holder of every chopstick, indexed by `ChopstickId`.
///
/// The only mutators are [`acquire`](Self::acquire) and
/// [`release`](Self::release); both check their precondition and fail with
/// a [`TableError`] instead of silently overwriting a holder.
#[derive(Clone, Debug)]
pub struct ResourceTable {
    chopsticks: Vec<Chopstick>,
}

impl ResourceTable {
    /// `count` chopsticks, all on the table.
    pub fn new(count: usize) -> Self {
        let chopsticks = (0..count as u32)
            .map(|i| Chopstick { id: ChopstickId(i), held_by: None })
            .collect();
        Self { chopsticks }
    }

    pub fn get(&self, id: ChopstickId) -> TableResult<&Chopstick> {
        self.chopsticks
            .get(id.index())
            .ok_or(TableError::UnknownChopstick(id))
    }

    /// `false` for unknown ids.
    #[inline]
    pub fn is_available(&self, id: ChopstickId) -> bool {
        self.chopsticks
            .get(id.index())
            .is_some_and(Chopstick::is_available)
    }

    #[inline]
    pub fn holder(&self, id: ChopstickId) -> Option<PhilosopherId> {
        self.chopsticks.get(id.index()).and_then(|c| c.held_by)
    }

    /// Give chopstick `id` to `philosopher`.  It must be available.
    pub fn acquire(&mut self, id: ChopstickId, philosopher: PhilosopherId) -> TableResult<()> {
        let slot = self
            .chopsticks
            .get_mut(id.index())
            .ok_or(TableError::UnknownChopstick(id))?;
        if let Some(holder) = slot.held_by {
            return Err(TableError::DoubleAcquire { chopstick: id, holder, requester: philosopher });
        }
        slot.held_by = Some(philosopher);
        Ok(())
    }

    /// Put chopstick `id` back and return its former holder.  It must be held.
    pub fn release(&mut self, id: ChopstickId) -> TableResult<PhilosopherId> {
        let slot = self
            .chopsticks
            .get_mut(id.index())
            .ok_or(TableError::UnknownChopstick(id))?;
        slot.held_by.take().ok_or(TableError::ReleaseFree(id))
    }

    /// Number of chopsticks currently held.
    pub fn held_count(&self) -> usize {
        self.chopsticks.iter().filter(|c| !c.is_available()).count()
    }

    /// `true` if no chopstick is left on the table.
    pub fn all_held(&self) -> bool {
        self.chopsticks.iter().all(|c| !c.is_available())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chopstick> + '_ {
        self.chopsticks.iter()
    }

    pub fn len(&self) -> usize {
        self.chopsticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chopsticks.is_empty()
    }
}
