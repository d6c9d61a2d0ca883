//! Parquet output backend (feature `parquet`).
//!
//! Creates one file per table in the configured output directory:
//! `realized_rides.parquet`, `cancelled_rides.parquet`,
//! `unroutable_rides.parquet`, `parking_stock.parquet`, `vehicles.parquet`
//! and `tick_summaries.parquet`.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float32Builder, Float64Builder, Int64Builder, StringBuilder,
    UInt32Builder, UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{
    CancelledRideRow, OutputError, OutputResult, ParkingStockRow, RealizedRideRow, TickSummaryRow,
    UnroutableRideRow, VehicleRow,
};

// ── Schemas ───────────────────────────────────────────────────────────────────

fn realized_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("ride_id",           DataType::UInt32,  false),
        Field::new("request_id",        DataType::UInt32,  false),
        Field::new("rider_id",          DataType::UInt32,  false),
        Field::new("vehicle_id",        DataType::UInt32,  false),
        Field::new("origin_id",         DataType::UInt32,  false),
        Field::new("destination_id",    DataType::UInt32,  false),
        Field::new("desired_unix_secs", DataType::Int64,   false),
        Field::new("start_unix_secs",   DataType::Int64,   false),
        Field::new("end_unix_secs",     DataType::Int64,   false),
        Field::new("distance_m",        DataType::Float64, false),
        Field::new("duration_secs",     DataType::UInt64,  false),
        Field::new("promo_used",        DataType::Boolean, false),
        Field::new("search_secs",       DataType::UInt64,  false),
        Field::new("attempts",          DataType::UInt32,  false),
    ]))
}

fn cancelled_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("ride_id",           DataType::UInt32, false),
        Field::new("request_id",        DataType::UInt32, false),
        Field::new("rider_id",          DataType::UInt32, false),
        Field::new("origin_id",         DataType::UInt32, false),
        Field::new("desired_unix_secs", DataType::Int64,  false),
        Field::new("search_secs",       DataType::UInt64, false),
        Field::new("attempts",          DataType::UInt32, false),
    ]))
}

fn unroutable_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("request_id",     DataType::UInt32, false),
        Field::new("rider_id",       DataType::UInt32, false),
        Field::new("vehicle_id",     DataType::UInt32, false),
        Field::new("origin_id",      DataType::UInt32, false),
        Field::new("destination_id", DataType::UInt32, false),
        Field::new("unix_time_secs", DataType::Int64,  false),
        Field::new("reason",         DataType::Utf8,   false),
    ]))
}

fn parking_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("parking_id",     DataType::UInt32,  false),
        Field::new("unix_time_secs", DataType::Int64,   false),
        Field::new("lat",            DataType::Float64, false),
        Field::new("lon",            DataType::Float64, false),
        Field::new("capacity",       DataType::UInt32,  false),
        Field::new("stock",          DataType::UInt32,  false),
    ]))
}

fn vehicle_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("vehicle_id",     DataType::UInt32,  false),
        Field::new("unix_time_secs", DataType::Int64,   false),
        Field::new("hardware_id",    DataType::Utf8,    false),
        Field::new("parking_id",     DataType::UInt32,  false),
        Field::new("in_transit",     DataType::Boolean, false),
        Field::new("progress",       DataType::Float32, false),
        Field::new("distance_m",     DataType::Float64, false),
    ]))
}

fn tick_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",           DataType::UInt64, false),
        Field::new("unix_time_secs", DataType::Int64,  false),
        Field::new("woken",          DataType::UInt64, false),
        Field::new("dispatched",     DataType::UInt64, false),
        Field::new("live_actors",    DataType::UInt64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// One open Parquet file and its schema.  `None` once closed.
struct Table {
    name:   &'static str,
    schema: Arc<Schema>,
    writer: Option<ArrowWriter<File>>,
}

impl Table {
    fn create(dir: &Path, name: &'static str, schema: Arc<Schema>) -> OutputResult<Self> {
        let file = File::create(dir.join(format!("{name}.parquet")))?;
        let writer = ArrowWriter::try_new(file, Arc::clone(&schema), Some(snappy_props()))?;
        Ok(Self { name, schema, writer: Some(writer) })
    }

    fn write(&mut self, columns: Vec<ArrayRef>) -> OutputResult<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(OutputError::Finished { table: self.name });
        };
        let batch = RecordBatch::try_new(Arc::clone(&self.schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn close(&mut self) -> OutputResult<()> {
        if let Some(w) = self.writer.take() {
            w.close()?;
        }
        Ok(())
    }
}

// ── ParquetWriter ─────────────────────────────────────────────────────────────

/// Writes simulation output to Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    realized:  Table,
    cancelled: Table,
    unroutable: Table,
    parking:   Table,
    vehicles:  Table,
    ticks:     Table,
}

impl ParquetWriter {
    /// Create all Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        Ok(Self {
            realized:  Table::create(dir, "realized_rides", realized_schema())?,
            cancelled: Table::create(dir, "cancelled_rides", cancelled_schema())?,
            unroutable: Table::create(dir, "unroutable_rides", unroutable_schema())?,
            parking:   Table::create(dir, "parking_stock", parking_schema())?,
            vehicles:  Table::create(dir, "vehicles", vehicle_schema())?,
            ticks:     Table::create(dir, "tick_summaries", tick_schema())?,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_realized(&mut self, rows: &[RealizedRideRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ride_ids     = UInt32Builder::new();
        let mut request_ids  = UInt32Builder::new();
        let mut rider_ids    = UInt32Builder::new();
        let mut vehicle_ids  = UInt32Builder::new();
        let mut origins      = UInt32Builder::new();
        let mut destinations = UInt32Builder::new();
        let mut desired      = Int64Builder::new();
        let mut starts       = Int64Builder::new();
        let mut ends         = Int64Builder::new();
        let mut distances    = Float64Builder::new();
        let mut durations    = UInt64Builder::new();
        let mut promos       = BooleanBuilder::new();
        let mut searches     = UInt64Builder::new();
        let mut attempts     = UInt32Builder::new();

        for r in rows {
            ride_ids.append_value(r.ride_id);
            request_ids.append_value(r.request_id);
            rider_ids.append_value(r.rider_id);
            vehicle_ids.append_value(r.vehicle_id);
            origins.append_value(r.origin_id);
            destinations.append_value(r.destination_id);
            desired.append_value(r.desired_unix_secs);
            starts.append_value(r.start_unix_secs);
            ends.append_value(r.end_unix_secs);
            distances.append_value(r.distance_m);
            durations.append_value(r.duration_secs);
            promos.append_value(r.promo_used);
            searches.append_value(r.search_secs);
            attempts.append_value(r.attempts);
        }

        self.realized.write(vec![
            Arc::new(ride_ids.finish()),
            Arc::new(request_ids.finish()),
            Arc::new(rider_ids.finish()),
            Arc::new(vehicle_ids.finish()),
            Arc::new(origins.finish()),
            Arc::new(destinations.finish()),
            Arc::new(desired.finish()),
            Arc::new(starts.finish()),
            Arc::new(ends.finish()),
            Arc::new(distances.finish()),
            Arc::new(durations.finish()),
            Arc::new(promos.finish()),
            Arc::new(searches.finish()),
            Arc::new(attempts.finish()),
        ])
    }

    fn write_cancelled(&mut self, rows: &[CancelledRideRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ride_ids    = UInt32Builder::new();
        let mut request_ids = UInt32Builder::new();
        let mut rider_ids   = UInt32Builder::new();
        let mut origins     = UInt32Builder::new();
        let mut desired     = Int64Builder::new();
        let mut searches    = UInt64Builder::new();
        let mut attempts    = UInt32Builder::new();

        for r in rows {
            ride_ids.append_value(r.ride_id);
            request_ids.append_value(r.request_id);
            rider_ids.append_value(r.rider_id);
            origins.append_value(r.origin_id);
            desired.append_value(r.desired_unix_secs);
            searches.append_value(r.search_secs);
            attempts.append_value(r.attempts);
        }

        self.cancelled.write(vec![
            Arc::new(ride_ids.finish()),
            Arc::new(request_ids.finish()),
            Arc::new(rider_ids.finish()),
            Arc::new(origins.finish()),
            Arc::new(desired.finish()),
            Arc::new(searches.finish()),
            Arc::new(attempts.finish()),
        ])
    }

    fn write_unroutable(&mut self, rows: &[UnroutableRideRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut request_ids  = UInt32Builder::new();
        let mut rider_ids    = UInt32Builder::new();
        let mut vehicle_ids  = UInt32Builder::new();
        let mut origins      = UInt32Builder::new();
        let mut destinations = UInt32Builder::new();
        let mut times        = Int64Builder::new();
        let mut reasons      = StringBuilder::new();

        for r in rows {
            request_ids.append_value(r.request_id);
            rider_ids.append_value(r.rider_id);
            vehicle_ids.append_value(r.vehicle_id);
            origins.append_value(r.origin_id);
            destinations.append_value(r.destination_id);
            times.append_value(r.unix_time_secs);
            reasons.append_value(r.reason);
        }

        self.unroutable.write(vec![
            Arc::new(request_ids.finish()),
            Arc::new(rider_ids.finish()),
            Arc::new(vehicle_ids.finish()),
            Arc::new(origins.finish()),
            Arc::new(destinations.finish()),
            Arc::new(times.finish()),
            Arc::new(reasons.finish()),
        ])
    }

    fn write_parking_stock(&mut self, rows: &[ParkingStockRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids        = UInt32Builder::new();
        let mut times      = Int64Builder::new();
        let mut lats       = Float64Builder::new();
        let mut lons       = Float64Builder::new();
        let mut capacities = UInt32Builder::new();
        let mut stocks     = UInt32Builder::new();

        for r in rows {
            ids.append_value(r.parking_id);
            times.append_value(r.unix_time_secs);
            lats.append_value(r.lat);
            lons.append_value(r.lon);
            capacities.append_value(r.capacity);
            stocks.append_value(r.stock);
        }

        self.parking.write(vec![
            Arc::new(ids.finish()),
            Arc::new(times.finish()),
            Arc::new(lats.finish()),
            Arc::new(lons.finish()),
            Arc::new(capacities.finish()),
            Arc::new(stocks.finish()),
        ])
    }

    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids        = UInt32Builder::new();
        let mut times      = Int64Builder::new();
        let mut hardware   = StringBuilder::new();
        let mut parking    = UInt32Builder::new();
        let mut in_transit = BooleanBuilder::new();
        let mut progress   = Float32Builder::new();
        let mut distances  = Float64Builder::new();

        for r in rows {
            ids.append_value(r.vehicle_id);
            times.append_value(r.unix_time_secs);
            hardware.append_value(&r.hardware_id);
            parking.append_value(r.parking_id);
            in_transit.append_value(r.in_transit);
            progress.append_value(r.progress);
            distances.append_value(r.distance_m);
        }

        self.vehicles.write(vec![
            Arc::new(ids.finish()),
            Arc::new(times.finish()),
            Arc::new(hardware.finish()),
            Arc::new(parking.finish()),
            Arc::new(in_transit.finish()),
            Arc::new(progress.finish()),
            Arc::new(distances.finish()),
        ])
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let mut ticks      = UInt64Builder::new();
        let mut unix_times = Int64Builder::new();
        let mut woken      = UInt64Builder::new();
        let mut dispatched = UInt64Builder::new();
        let mut live       = UInt64Builder::new();

        ticks.append_value(row.tick);
        unix_times.append_value(row.unix_time_secs);
        woken.append_value(row.woken);
        dispatched.append_value(row.dispatched);
        live.append_value(row.live_actors);

        self.ticks.write(vec![
            Arc::new(ticks.finish()),
            Arc::new(unix_times.finish()),
            Arc::new(woken.finish()),
            Arc::new(dispatched.finish()),
            Arc::new(live.finish()),
        ])
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.realized.close()?;
        self.cancelled.close()?;
        self.unroutable.close()?;
        self.parking.close()?;
        self.vehicles.close()?;
        self.ticks.close()?;
        Ok(())
    }
}
