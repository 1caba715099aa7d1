//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `philosophers.csv`
//! - `batches.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BatchSummaryRow, OutputResult, PhilosopherRow};

pub(crate) const PHILOSOPHER_COLUMNS: [&str; 12] = [
    "batch", "time", "philosopher", "state", "has_left", "has_right",
    "thinking_time", "thinking_count", "eating_time", "eating_count",
    "waiting_time", "waiting_count",
];

pub(crate) const BATCH_COLUMNS: [&str; 5] = ["batch", "time", "events_processed", "conflicts", "deadlock"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    philosophers: Writer<File>,
    batches:      Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut philosophers = Writer::from_path(dir.join("philosophers.csv"))?;
        philosophers.write_record(PHILOSOPHER_COLUMNS)?;

        let mut batches = Writer::from_path(dir.join("batches.csv"))?;
        batches.write_record(BATCH_COLUMNS)?;

        Ok(Self { philosophers, batches, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_philosophers(&mut self, rows: &[PhilosopherRow]) -> OutputResult<()> {
        for row in rows {
            self.philosophers.write_record(&[
                row.batch.to_string(),
                row.time.to_string(),
                row.philosopher.to_string(),
                row.state.name().to_owned(),
                (row.has_left as u8).to_string(),
                (row.has_right as u8).to_string(),
                row.thinking_time.to_string(),
                row.thinking_count.to_string(),
                row.eating_time.to_string(),
                row.eating_count.to_string(),
                row.waiting_time.to_string(),
                row.waiting_count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_batch_summary(&mut self, row: &BatchSummaryRow) -> OutputResult<()> {
        self.batches.write_record(&[
            row.batch.to_string(),
            row.time.to_string(),
            row.events_processed.to_string(),
            row.conflicts.to_string(),
            (row.deadlock as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.philosophers.flush()?;
        self.batches.flush()?;
        Ok(())
    }
}
