//! `dp-output`: run recorders for the dining-philosophers engine.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                 |
//! |-----------|-------------|-----------------------------------------------|
//! | *(none)*  | CSV         | `philosophers.csv`, `batches.csv`             |
//! | `sqlite`  | SQLite      | `output.db`                                   |
//! | `parquet` | Parquet     | `philosophers.parquet`, `batches.parquet`     |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `dp_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dp_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.finish()?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{SimOutputObserver, philosopher_rows};
pub use row::{BatchSummaryRow, PhilosopherRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
