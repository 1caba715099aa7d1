//! `dp-table`: who holds which chopstick, and what each philosopher is doing.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`chopstick`]   | `Chopstick`, `ResourceTable` (acquire / release)          |
//! | [`philosopher`] | `Philosopher`, `PhilosopherState`, `PhilosopherStats`     |
//! | [`store`]       | `DiningTable`: both of the above plus the consistency audit |
//! | [`error`]       | `TableError`, `TableResult<T>`                            |
//!
//! Everything that can go wrong here is an internal-consistency error: the
//! simulation only ever acquires a chopstick it has just checked, so a
//! `TableError` always means a bug upstream, never a user mistake.

pub mod chopstick;
pub mod error;
pub mod philosopher;
pub mod store;


pub use chopstick::{Chopstick, ResourceTable};
pub use error::{TableError, TableResult};
pub use philosopher::{Philosopher, PhilosopherState, PhilosopherStats, Took};
pub use store::DiningTable;
