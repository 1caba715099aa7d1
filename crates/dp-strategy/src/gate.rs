//! Acquisition-gate outcomes.

use std::fmt;

use dp_core::{ChopstickId, PhilosopherId};

/// Answer to "may this philosopher take this chopstick now?".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    Granted,
    /// The chopstick is on someone else's plate.
    Busy { holder: PhilosopherId },
    /// The chopstick is free but the strategy says no.
    Refused(Refusal),
}

impl Admission {
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted)
    }
}

/// Why a strategy turned down a request for a free chopstick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Refusal {
    /// Waiter: every admission slot is taken by someone holding a chopstick.
    WaiterFull { admitted: usize, permissions: usize },
    /// Resource hierarchy: the lower-numbered chopstick must come first.
    OutOfOrder { lower: ChopstickId },
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::WaiterFull { admitted, permissions } => {
                write!(f, "waiter full ({admitted}/{permissions})")
            }
            Refusal::OutOfOrder { lower } => write!(f, "must take {lower} first"),
        }
    }
}
