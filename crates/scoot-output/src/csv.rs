//! CSV output backend.
//!
//! Creates six files in the configured output directory:
//! `realized_rides.csv`, `cancelled_rides.csv`, `unroutable_rides.csv`,
//! `parking_stock.csv`, `vehicles.csv` and `tick_summaries.csv`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{
    CancelledRideRow, OutputError, OutputResult, ParkingStockRow, RealizedRideRow, TickSummaryRow,
    UnroutableRideRow, VehicleRow,
};

pub const REALIZED_HEADER: [&str; 14] = [
    "ride_id", "request_id", "rider_id", "vehicle_id", "origin_id", "destination_id",
    "desired_unix_secs", "start_unix_secs", "end_unix_secs", "distance_m", "duration_secs",
    "promo_used", "search_secs", "attempts",
];

pub const CANCELLED_HEADER: [&str; 7] = [
    "ride_id", "request_id", "rider_id", "origin_id", "desired_unix_secs", "search_secs", "attempts",
];

pub const UNROUTABLE_HEADER: [&str; 7] = [
    "request_id", "rider_id", "vehicle_id", "origin_id", "destination_id", "unix_time_secs", "reason",
];

pub const PARKING_HEADER: [&str; 6] = ["parking_id", "unix_time_secs", "lat", "lon", "capacity", "stock"];

pub const VEHICLE_HEADER: [&str; 7] = [
    "vehicle_id", "unix_time_secs", "hardware_id", "parking_id", "in_transit", "progress", "distance_m",
];

pub const TICK_HEADER: [&str; 5] = ["tick", "unix_time_secs", "woken", "dispatched", "live_actors"];

/// Writes simulation output to CSV files.
pub struct CsvWriter {
    realized:  Writer<File>,
    cancelled: Writer<File>,
    unroutable: Writer<File>,
    parking:   Writer<File>,
    vehicles:  Writer<File>,
    ticks:     Writer<File>,
    finished:  bool,
}

fn open(dir: &Path, name: &str, header: &[&str]) -> OutputResult<Writer<File>> {
    let mut w = Writer::from_path(dir.join(name))?;
    w.write_record(header)?;
    Ok(w)
}

impl CsvWriter {
    /// Create `dir` if needed, open the CSV files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        Ok(Self {
            realized:  open(dir, "realized_rides.csv", &REALIZED_HEADER)?,
            cancelled: open(dir, "cancelled_rides.csv", &CANCELLED_HEADER)?,
            unroutable: open(dir, "unroutable_rides.csv", &UNROUTABLE_HEADER)?,
            parking:   open(dir, "parking_stock.csv", &PARKING_HEADER)?,
            vehicles:  open(dir, "vehicles.csv", &VEHICLE_HEADER)?,
            ticks:     open(dir, "tick_summaries.csv", &TICK_HEADER)?,
            finished:  false,
        })
    }

    fn check_open(&self, table: &'static str) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished { table });
        }
        Ok(())
    }
}

impl OutputWriter for CsvWriter {
    fn write_realized(&mut self, rows: &[RealizedRideRow]) -> OutputResult<()> {
        self.check_open("realized_rides")?;
        for row in rows {
            self.realized.write_record(&[
                row.ride_id.to_string(),
                row.request_id.to_string(),
                row.rider_id.to_string(),
                row.vehicle_id.to_string(),
                row.origin_id.to_string(),
                row.destination_id.to_string(),
                row.desired_unix_secs.to_string(),
                row.start_unix_secs.to_string(),
                row.end_unix_secs.to_string(),
                format!("{:.1}", row.distance_m),
                row.duration_secs.to_string(),
                (row.promo_used as u8).to_string(),
                row.search_secs.to_string(),
                row.attempts.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_cancelled(&mut self, rows: &[CancelledRideRow]) -> OutputResult<()> {
        self.check_open("cancelled_rides")?;
        for row in rows {
            self.cancelled.write_record(&[
                row.ride_id.to_string(),
                row.request_id.to_string(),
                row.rider_id.to_string(),
                row.origin_id.to_string(),
                row.desired_unix_secs.to_string(),
                row.search_secs.to_string(),
                row.attempts.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_unroutable(&mut self, rows: &[UnroutableRideRow]) -> OutputResult<()> {
        self.check_open("unroutable_rides")?;
        for row in rows {
            self.unroutable.write_record(&[
                row.request_id.to_string(),
                row.rider_id.to_string(),
                row.vehicle_id.to_string(),
                row.origin_id.to_string(),
                row.destination_id.to_string(),
                row.unix_time_secs.to_string(),
                row.reason.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_parking_stock(&mut self, rows: &[ParkingStockRow]) -> OutputResult<()> {
        self.check_open("parking_stock")?;
        for row in rows {
            self.parking.write_record(&[
                row.parking_id.to_string(),
                row.unix_time_secs.to_string(),
                row.lat.to_string(),
                row.lon.to_string(),
                row.capacity.to_string(),
                row.stock.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()> {
        self.check_open("vehicles")?;
        for row in rows {
            self.vehicles.write_record(&[
                row.vehicle_id.to_string(),
                row.unix_time_secs.to_string(),
                row.hardware_id.clone(),
                row.parking_id.to_string(),
                (row.in_transit as u8).to_string(),
                format!("{:.3}", row.progress),
                format!("{:.1}", row.distance_m),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.check_open("tick_summaries")?;
        self.ticks.write_record(&[
            row.tick.to_string(),
            row.unix_time_secs.to_string(),
            row.woken.to_string(),
            row.dispatched.to_string(),
            row.live_actors.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.realized.flush()?;
        self.cancelled.flush()?;
        self.unroutable.flush()?;
        self.parking.flush()?;
        self.vehicles.flush()?;
        self.ticks.flush()?;
        Ok(())
    }
}
