//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `philosophers.parquet`
//! - `batches.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{BooleanBuilder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{BatchSummaryRow, OutputResult, PhilosopherRow};

fn philosopher_schema() -> Arc<Schema> {
    let counter = |name: &str| Field::new(name, DataType::UInt64, false);
    Arc::new(Schema::new(vec![
        counter("batch"),
        counter("time"),
        Field::new("philosopher", DataType::UInt32,  false),
        Field::new("state",       DataType::Utf8,    false),
        Field::new("has_left",    DataType::Boolean, false),
        Field::new("has_right",   DataType::Boolean, false),
        counter("thinking_time"),
        counter("thinking_count"),
        counter("eating_time"),
        counter("eating_count"),
        counter("waiting_time"),
        counter("waiting_count"),
    ]))
}

fn batch_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("batch",            DataType::UInt64,  false),
        Field::new("time",             DataType::UInt64,  false),
        Field::new("events_processed", DataType::UInt64,  false),
        Field::new("conflicts",        DataType::UInt64,  false),
        Field::new("deadlock",         DataType::Boolean, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet footer; files written
/// without it cannot be opened by Parquet readers.
pub struct ParquetWriter {
    philosophers: Option<ArrowWriter<File>>,
    batches:      Option<ArrowWriter<File>>,
    phil_schema:  Arc<Schema>,
    batch_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let phil_schema = philosopher_schema();
        let batch_schema = batch_schema();

        let philosophers = ArrowWriter::try_new(
            File::create(dir.join("philosophers.parquet"))?,
            Arc::clone(&phil_schema),
            Some(snappy_props()),
        )?;
        let batches = ArrowWriter::try_new(
            File::create(dir.join("batches.parquet"))?,
            Arc::clone(&batch_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            philosophers: Some(philosophers),
            batches:      Some(batches),
            phil_schema,
            batch_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_philosophers(&mut self, rows: &[PhilosopherRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.philosophers.as_mut() else {
            return Ok(());
        };

        let mut batch       = UInt64Builder::new();
        let mut time        = UInt64Builder::new();
        let mut philosopher = UInt32Builder::new();
        let mut state       = StringBuilder::new();
        let mut has_left    = BooleanBuilder::new();
        let mut has_right   = BooleanBuilder::new();
        // thinking time/count, eating time/count, waiting time/count
        let mut totals: [UInt64Builder; 6] = std::array::from_fn(|_| UInt64Builder::new());

        for row in rows {
            batch.append_value(row.batch);
            time.append_value(row.time);
            philosopher.append_value(row.philosopher);
            state.append_value(row.state.name());
            has_left.append_value(row.has_left);
            has_right.append_value(row.has_right);
            let values = [
                row.thinking_time,
                row.thinking_count,
                row.eating_time,
                row.eating_count,
                row.waiting_time,
                row.waiting_count,
            ];
            for (builder, value) in totals.iter_mut().zip(values) {
                builder.append_value(value);
            }
        }

        let mut columns: Vec<arrow::array::ArrayRef> = vec![
            Arc::new(batch.finish()),
            Arc::new(time.finish()),
            Arc::new(philosopher.finish()),
            Arc::new(state.finish()),
            Arc::new(has_left.finish()),
            Arc::new(has_right.finish()),
        ];
        columns.extend(totals.iter_mut().map(|b| Arc::new(b.finish()) as arrow::array::ArrayRef));

        let record = RecordBatch::try_new(Arc::clone(&self.phil_schema), columns)?;
        writer.write(&record)?;
        Ok(())
    }

    fn write_batch_summary(&mut self, row: &BatchSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.batches.as_mut() else {
            return Ok(());
        };

        let mut batch     = UInt64Builder::new();
        let mut time      = UInt64Builder::new();
        let mut events    = UInt64Builder::new();
        let mut conflicts = UInt64Builder::new();
        let mut deadlock  = BooleanBuilder::new();

        batch.append_value(row.batch);
        time.append_value(row.time);
        events.append_value(row.events_processed);
        conflicts.append_value(row.conflicts);
        deadlock.append_value(row.deadlock);

        let record = RecordBatch::try_new(
            Arc::clone(&self.batch_schema),
            vec![
                Arc::new(batch.finish()),
                Arc::new(time.finish()),
                Arc::new(events.finish()),
                Arc::new(conflicts.finish()),
                Arc::new(deadlock.finish()),
            ],
        )?;
        writer.write(&record)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.philosophers.take() {
            w.close()?;
        }
        if let Some(w) = self.batches.take() {
            w.close()?;
        }
        Ok(())
    }
}
