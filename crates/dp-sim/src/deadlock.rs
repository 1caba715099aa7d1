//! Circular-wait detection.
//!
//! The predicate is deliberately narrow: it recognises only the classic
//! pattern where every philosopher holds exactly its left chopstick and is
//! waiting for its right one.  A table stuck with some philosophers holding
//! only their right chopstick is not reported.

use dp_table::{DiningTable, PhilosopherState};

use crate::{SimError, SimResult};

/// `Ok(true)` if the table is in the left-only circular wait.
///
/// When every philosopher matches, every chopstick must be held; anything
/// else means the `has_*` flags and the resource table disagree.
pub fn detect(table: &DiningTable) -> SimResult<bool> {
    let circular = table.philosophers().iter().all(|p| {
        p.has_left() && !p.has_right() && p.state() == PhilosopherState::Waiting
    });
    if !circular {
        return Ok(false);
    }

    let chopsticks = table.chopsticks();
    if !chopsticks.all_held() {
        return Err(SimError::DeadlockCheck { free: chopsticks.len() - chopsticks.held_count() });
    }
    Ok(true)
}
