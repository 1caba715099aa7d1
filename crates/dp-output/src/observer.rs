//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use dp_sim::{SimObserver, Snapshot, Terminal};

use crate::row::{BatchSummaryRow, PhilosopherRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes philosopher rows and batch summaries to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// A summary row is written after every batch.  Philosopher rows are written
/// every `interval` batches and once more for the terminal batch.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:       W,
    interval:     u64,
    last_written: Option<u64>,
    last_error:   Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Record philosophers after every batch.
    pub fn new(writer: W) -> Self {
        Self::with_interval(writer, 1)
    }

    /// Record philosophers every `interval` batches (0 means only at the end).
    pub fn with_interval(writer: W, interval: u64) -> Self {
        Self { writer, interval, last_written: None, last_error: None }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Needed when a run ends on the batch bound rather
    /// than a terminal outcome.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_philosophers(&mut self, snapshot: &Snapshot) {
        let batch = snapshot.stats.batches;
        if self.last_written == Some(batch) {
            return;
        }
        self.last_written = Some(batch);
        let rows = philosopher_rows(snapshot);
        let result = self.writer.write_philosophers(&rows);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_batch_end(&mut self, snapshot: &Snapshot) {
        let stats = &snapshot.stats;
        let row = BatchSummaryRow {
            batch:            stats.batches,
            time:             stats.time.0,
            events_processed: stats.events_processed,
            conflicts:        stats.conflicts,
            deadlock:         stats.deadlock,
        };
        let result = self.writer.write_batch_summary(&row);
        self.store_err(result);

        if self.interval > 0 && stats.batches.is_multiple_of(self.interval) {
            self.write_philosophers(snapshot);
        }
    }

    fn on_terminal(&mut self, _terminal: Terminal, snapshot: &Snapshot) {
        self.write_philosophers(snapshot);
        let result = self.writer.finish();
        self.store_err(result);
    }
}

/// One row per philosopher in `snapshot`.
pub fn philosopher_rows(snapshot: &Snapshot) -> Vec<PhilosopherRow> {
    snapshot
        .philosophers
        .iter()
        .map(|p| {
            let s = p.stats();
            PhilosopherRow {
                batch:          snapshot.stats.batches,
                time:           snapshot.stats.time.0,
                philosopher:    p.id().0,
                state:          p.state(),
                has_left:       p.has_left(),
                has_right:      p.has_right(),
                thinking_time:  s.thinking_time,
                thinking_count: s.thinking_count,
                eating_time:    s.eating_time,
                eating_count:   s.eating_count,
                waiting_time:   s.waiting_time,
                waiting_count:  s.waiting_count,
            }
        })
        .collect()
}
