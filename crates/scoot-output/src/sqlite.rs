//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! six tables: `realized_rides`, `cancelled_rides`, `unroutable_rides`,
//! `parking_stock`, `vehicles` and `tick_summaries`.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::error::ensure_dir;
use crate::writer::OutputWriter;
use crate::{
    CancelledRideRow, OutputError, OutputResult, ParkingStockRow, RealizedRideRow, TickSummaryRow,
    UnroutableRideRow, VehicleRow,
};

const SCHEMA: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous  = NORMAL;
    CREATE TABLE IF NOT EXISTS realized_rides (
        ride_id           INTEGER PRIMARY KEY,
        request_id        INTEGER NOT NULL,
        rider_id          INTEGER NOT NULL,
        vehicle_id        INTEGER NOT NULL,
        origin_id         INTEGER NOT NULL,
        destination_id    INTEGER NOT NULL,
        desired_unix_secs INTEGER NOT NULL,
        start_unix_secs   INTEGER NOT NULL,
        end_unix_secs     INTEGER NOT NULL,
        distance_m        REAL    NOT NULL,
        duration_secs     INTEGER NOT NULL,
        promo_used        INTEGER NOT NULL,
        search_secs       INTEGER NOT NULL,
        attempts          INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS cancelled_rides (
        ride_id           INTEGER PRIMARY KEY,
        request_id        INTEGER NOT NULL,
        rider_id          INTEGER NOT NULL,
        origin_id         INTEGER NOT NULL,
        desired_unix_secs INTEGER NOT NULL,
        search_secs       INTEGER NOT NULL,
        attempts          INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS unroutable_rides (
        request_id     INTEGER PRIMARY KEY,
        rider_id       INTEGER NOT NULL,
        vehicle_id     INTEGER NOT NULL,
        origin_id      INTEGER NOT NULL,
        destination_id INTEGER NOT NULL,
        unix_time_secs INTEGER NOT NULL,
        reason         TEXT    NOT NULL
    );
    CREATE TABLE IF NOT EXISTS parking_stock (
        parking_id     INTEGER NOT NULL,
        unix_time_secs INTEGER NOT NULL,
        lat            REAL    NOT NULL,
        lon            REAL    NOT NULL,
        capacity       INTEGER NOT NULL,
        stock          INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS vehicles (
        vehicle_id     INTEGER NOT NULL,
        unix_time_secs INTEGER NOT NULL,
        hardware_id    TEXT    NOT NULL,
        parking_id     INTEGER NOT NULL,
        in_transit     INTEGER NOT NULL,
        progress       REAL    NOT NULL,
        distance_m     REAL    NOT NULL
    );
    CREATE TABLE IF NOT EXISTS tick_summaries (
        tick           INTEGER PRIMARY KEY,
        unix_time_secs INTEGER NOT NULL,
        woken          INTEGER NOT NULL,
        dispatched     INTEGER NOT NULL,
        live_actors    INTEGER NOT NULL
    );";

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, finished: false })
    }

    /// Insert `rows` with one prepared statement inside one transaction.
    fn insert_all<T>(
        &mut self,
        table: &'static str,
        sql: &str,
        rows: &[T],
        bind: impl Fn(&mut rusqlite::CachedStatement<'_>, &T) -> rusqlite::Result<usize>,
    ) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished { table });
        }
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for row in rows {
                bind(&mut stmt, row)?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn write_realized(&mut self, rows: &[RealizedRideRow]) -> OutputResult<()> {
        self.insert_all(
            "realized_rides",
            "INSERT INTO realized_rides \
             (ride_id, request_id, rider_id, vehicle_id, origin_id, destination_id, \
              desired_unix_secs, start_unix_secs, end_unix_secs, distance_m, duration_secs, \
              promo_used, search_secs, attempts) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            rows,
            |stmt, r| {
                stmt.execute(params![
                    r.ride_id,
                    r.request_id,
                    r.rider_id,
                    r.vehicle_id,
                    r.origin_id,
                    r.destination_id,
                    r.desired_unix_secs,
                    r.start_unix_secs,
                    r.end_unix_secs,
                    r.distance_m,
                    r.duration_secs as i64,
                    r.promo_used as i64,
                    r.search_secs as i64,
                    r.attempts,
                ])
            },
        )
    }

    fn write_cancelled(&mut self, rows: &[CancelledRideRow]) -> OutputResult<()> {
        self.insert_all(
            "cancelled_rides",
            "INSERT INTO cancelled_rides \
             (ride_id, request_id, rider_id, origin_id, desired_unix_secs, search_secs, attempts) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rows,
            |stmt, r| {
                stmt.execute(params![
                    r.ride_id,
                    r.request_id,
                    r.rider_id,
                    r.origin_id,
                    r.desired_unix_secs,
                    r.search_secs as i64,
                    r.attempts,
                ])
            },
        )
    }

    fn write_unroutable(&mut self, rows: &[UnroutableRideRow]) -> OutputResult<()> {
        self.insert_all(
            "unroutable_rides",
            "INSERT INTO unroutable_rides \
             (request_id, rider_id, vehicle_id, origin_id, destination_id, unix_time_secs, reason) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rows,
            |stmt, r| {
                stmt.execute(params![
                    r.request_id,
                    r.rider_id,
                    r.vehicle_id,
                    r.origin_id,
                    r.destination_id,
                    r.unix_time_secs,
                    r.reason,
                ])
            },
        )
    }

    fn write_parking_stock(&mut self, rows: &[ParkingStockRow]) -> OutputResult<()> {
        self.insert_all(
            "parking_stock",
            "INSERT INTO parking_stock (parking_id, unix_time_secs, lat, lon, capacity, stock) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rows,
            |stmt, r| stmt.execute(params![r.parking_id, r.unix_time_secs, r.lat, r.lon, r.capacity, r.stock]),
        )
    }

    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()> {
        self.insert_all(
            "vehicles",
            "INSERT INTO vehicles \
             (vehicle_id, unix_time_secs, hardware_id, parking_id, in_transit, progress, distance_m) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rows,
            |stmt, r| {
                stmt.execute(params![
                    r.vehicle_id,
                    r.unix_time_secs,
                    r.hardware_id,
                    r.parking_id,
                    r.in_transit as i64,
                    r.progress as f64,
                    r.distance_m,
                ])
            },
        )
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished { table: "tick_summaries" });
        }
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, unix_time_secs, woken, dispatched, live_actors) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.tick as i64,
                row.unix_time_secs,
                row.woken as i64,
                row.dispatched as i64,
                row.live_actors as i64,
            ],
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
