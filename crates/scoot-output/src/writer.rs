//! The `OutputWriter` trait implemented by all backend writers.

use crate::{
    CancelledRideRow, OutputResult, ParkingStockRow, RealizedRideRow, TickSummaryRow,
    UnroutableRideRow, VehicleRow,
};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors are returned to the caller; [`SimOutputObserver`](crate::SimOutputObserver)
/// stores the first one for [`take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of realized rides.
    fn write_realized(&mut self, rows: &[RealizedRideRow]) -> OutputResult<()>;

    /// Write a batch of cancelled rides.
    fn write_cancelled(&mut self, rows: &[CancelledRideRow]) -> OutputResult<()>;

    /// Write a batch of unroutable rides.
    fn write_unroutable(&mut self, rows: &[UnroutableRideRow]) -> OutputResult<()>;

    /// Write one snapshot's parking stock rows.
    fn write_parking_stock(&mut self, rows: &[ParkingStockRow]) -> OutputResult<()>;

    /// Write one snapshot's vehicle rows.
    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Lets a backend chosen at runtime drive [`SimOutputObserver`](crate::SimOutputObserver).
impl<W: OutputWriter + ?Sized> OutputWriter for Box<W> {
    fn write_realized(&mut self, rows: &[RealizedRideRow]) -> OutputResult<()> {
        (**self).write_realized(rows)
    }

    fn write_cancelled(&mut self, rows: &[CancelledRideRow]) -> OutputResult<()> {
        (**self).write_cancelled(rows)
    }

    fn write_unroutable(&mut self, rows: &[UnroutableRideRow]) -> OutputResult<()> {
        (**self).write_unroutable(rows)
    }

    fn write_parking_stock(&mut self, rows: &[ParkingStockRow]) -> OutputResult<()> {
        (**self).write_parking_stock(rows)
    }

    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()> {
        (**self).write_vehicles(rows)
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        (**self).write_tick_summary(row)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
