//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `philosophers` and `batches`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{BatchSummaryRow, OutputResult, PhilosopherRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS philosophers (
                 batch          INTEGER NOT NULL,
                 time           INTEGER NOT NULL,
                 philosopher    INTEGER NOT NULL,
                 state          TEXT    NOT NULL,
                 has_left       INTEGER NOT NULL,
                 has_right      INTEGER NOT NULL,
                 thinking_time  INTEGER NOT NULL,
                 thinking_count INTEGER NOT NULL,
                 eating_time    INTEGER NOT NULL,
                 eating_count   INTEGER NOT NULL,
                 waiting_time   INTEGER NOT NULL,
                 waiting_count  INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS batches (
                 batch            INTEGER PRIMARY KEY,
                 time             INTEGER NOT NULL,
                 events_processed INTEGER NOT NULL,
                 conflicts        INTEGER NOT NULL,
                 deadlock         INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_philosophers(&mut self, rows: &[PhilosopherRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO philosophers \
                 (batch, time, philosopher, state, has_left, has_right, \
                  thinking_time, thinking_count, eating_time, eating_count, \
                  waiting_time, waiting_count) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.batch,
                    row.time,
                    row.philosopher,
                    row.state.name(),
                    row.has_left as i64,
                    row.has_right as i64,
                    row.thinking_time,
                    row.thinking_count,
                    row.eating_time,
                    row.eating_count,
                    row.waiting_time,
                    row.waiting_count,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_batch_summary(&mut self, row: &BatchSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO batches (batch, time, events_processed, conflicts, deadlock) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![row.batch, row.time, row.events_processed, row.conflicts, row.deadlock as i64],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
