use dp_core::{ChopstickId, PhilosopherId, Side};
use thiserror::Error;

use crate::PhilosopherState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("chopstick {0} does not exist")]
    UnknownChopstick(ChopstickId),

    #[error("philosopher {0} does not exist")]
    UnknownPhilosopher(PhilosopherId),

    #[error("{requester} acquired {chopstick} which is already held by {holder}")]
    DoubleAcquire {
        chopstick: ChopstickId,
        holder:    PhilosopherId,
        requester: PhilosopherId,
    },

    #[error("released {0} which is not held")]
    ReleaseFree(ChopstickId),

    #[error("{philosopher} already holds its {side} chopstick")]
    AlreadyHolding {
        philosopher: PhilosopherId,
        side:        Side,
    },

    #[error("{philosopher} is {found}, expected {expected}")]
    UnexpectedState {
        philosopher: PhilosopherId,
        expected:    &'static str,
        found:       PhilosopherState,
    },

    #[error("{chopstick} is held by {holder:?} but {philosopher} flags disagree")]
    FlagMismatch {
        chopstick:   ChopstickId,
        philosopher: PhilosopherId,
        holder:      Option<PhilosopherId>,
    },
}

pub type TableResult<T> = Result<T, TableError>;
