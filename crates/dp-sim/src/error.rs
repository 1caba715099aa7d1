use dp_core::DpError;
use dp_table::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected configuration.  Engine state is unchanged.
    #[error(transparent)]
    Config(#[from] DpError),

    /// A broken resource or state-machine invariant.  Fatal.
    #[error("internal consistency error: {0}")]
    Table(#[from] TableError),

    /// Every philosopher waits holding only its left chopstick, yet some
    /// chopsticks are still on the table.  Fatal.
    #[error("internal consistency error: circular wait with {free} free chopstick(s)")]
    DeadlockCheck { free: usize },

    #[error("simulation halted by an earlier internal consistency error; reset to continue")]
    Halted,
}

impl SimError {
    /// `true` for caller mistakes, `false` for invariant violations.
    pub fn is_config(&self) -> bool {
        matches!(self, SimError::Config(_))
    }
}

pub type SimResult<T> = Result<T, SimError>;
