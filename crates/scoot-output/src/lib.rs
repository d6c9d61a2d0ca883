//! `scoot-output` — simulation output writers for `scootsim`.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                       |
//! |-----------|-------------|-----------------------------------------------------|
//! | *(none)*  | CSV         | `realized_rides.csv`, `cancelled_rides.csv`,        |
//! |           |             | `unroutable_rides.csv`,                             |
//! |           |             | `parking_stock.csv`, `vehicles.csv`,                |
//! |           |             | `tick_summaries.csv`                                |
//! | `sqlite`  | SQLite      | `output.db` (one table per CSV file)                |
//! | `parquet` | Parquet     | one `.parquet` file per table                       |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `scoot_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use scoot_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &sim.config).with_snapshot_interval(3_600);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     log::error!("output error: {e}");
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

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{ensure_dir, OutputError, OutputResult};
pub use observer::{SimOutputObserver, DEFAULT_BATCH_ROWS};
pub use row::{
    CancelledRideRow, ParkingStockRow, RealizedRideRow, TickSummaryRow, UnroutableRideRow, VehicleRow,
};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
