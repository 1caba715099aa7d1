//! Plain data row types written by output backends.

use dp_table::PhilosopherState;

/// One philosopher as of the end of a batch.  Totals and counts are
/// cumulative since the last initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhilosopherRow {
    pub batch:          u64,
    pub time:           u64,
    pub philosopher:    u32,
    pub state:          PhilosopherState,
    pub has_left:       bool,
    pub has_right:      bool,
    pub thinking_time:  u64,
    pub thinking_count: u64,
    pub eating_time:    u64,
    pub eating_count:   u64,
    pub waiting_time:   u64,
    pub waiting_count:  u64,
}

/// Table-wide counters after one batch (cumulative).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummaryRow {
    pub batch:            u64,
    pub time:             u64,
    pub events_processed: u64,
    pub conflicts:        u64,
    pub deadlock:         bool,
}
