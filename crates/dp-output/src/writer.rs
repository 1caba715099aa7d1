//! The `OutputWriter` trait implemented by all backend writers.

use crate::{BatchSummaryRow, OutputResult, PhilosopherRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors surface through [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error]
/// when a writer is driven by the simulation.
pub trait OutputWriter {
    /// Write one batch worth of philosopher rows.
    fn write_philosophers(&mut self, rows: &[PhilosopherRow]) -> OutputResult<()>;

    fn write_batch_summary(&mut self, row: &BatchSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
