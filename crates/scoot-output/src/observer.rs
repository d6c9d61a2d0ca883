//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use scoot_core::{SimConfig, Tick};
use scoot_sim::{
    CancelledRide, RealizedRide, RunSummary, SimObserver, SimulationState, TickActivity,
    UnroutableRide,
};

use crate::row::{
    CancelledRideRow, ParkingStockRow, RealizedRideRow, TickSummaryRow, UnroutableRideRow, VehicleRow,
};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Ride rows buffered before a batch write.
pub const DEFAULT_BATCH_ROWS: usize = 1_024;

/// A [`SimObserver`] that writes rides (realized, cancelled and unroutable),
/// tick summaries and parking/vehicle
/// snapshots to any [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Ride rows are buffered and written in batches.  Snapshots are taken at
/// the first processed tick at or after each multiple of the snapshot
/// interval, and once more when the run ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:          W,
    start_unix_secs: i64,
    batch_rows:      usize,
    snapshot_every:  Option<u64>,
    next_snapshot:   Tick,
    realized:        Vec<RealizedRideRow>,
    cancelled:       Vec<CancelledRideRow>,
    unroutable:      Vec<UnroutableRideRow>,
    last_error:      Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.  Only the end-of-run snapshot is written by default.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            start_unix_secs: config.start_unix_secs,
            batch_rows:      DEFAULT_BATCH_ROWS,
            snapshot_every:  None,
            next_snapshot:   Tick::ZERO,
            realized:        Vec::new(),
            cancelled:       Vec::new(),
            unroutable:      Vec::new(),
            last_error:      None,
        }
    }

    /// Also snapshot parking stock and vehicles every `secs` of simulated
    /// time.  `0` disables periodic snapshots.
    pub fn with_snapshot_interval(mut self, secs: u64) -> Self {
        self.snapshot_every = (secs > 0).then_some(secs);
        self
    }

    /// Flush ride rows every `rows` rides (at least 1).
    pub fn with_batch_rows(mut self, rows: usize) -> Self {
        self.batch_rows = rows.max(1);
        self
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn unix_time(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::error!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }

    fn flush_rides(&mut self) {
        if !self.realized.is_empty() {
            let rows = std::mem::take(&mut self.realized);
            let result = self.writer.write_realized(&rows);
            self.store_err(result);
        }
        if !self.cancelled.is_empty() {
            let rows = std::mem::take(&mut self.cancelled);
            let result = self.writer.write_cancelled(&rows);
            self.store_err(result);
        }
        if !self.unroutable.is_empty() {
            let rows = std::mem::take(&mut self.unroutable);
            let result = self.writer.write_unroutable(&rows);
            self.store_err(result);
        }
    }

    fn snapshot(&mut self, tick: Tick, state: &SimulationState) {
        let unix_time_secs = self.unix_time(tick);
        let fleet = state.fleet();

        let mut parking: Vec<ParkingStockRow> = fleet
            .pool
            .lots()
            .map(|lot| ParkingStockRow {
                parking_id: lot.id.0,
                unix_time_secs,
                lat:        lot.pos.lat,
                lon:        lot.pos.lon,
                capacity:   lot.capacity,
                stock:      lot.len() as u32,
            })
            .collect();
        parking.sort_by_key(|r| r.parking_id);

        let vehicles: Vec<VehicleRow> = fleet
            .vehicles
            .iter()
            .map(|v| {
                let trip = fleet.transit.get(v.id);
                VehicleRow {
                    vehicle_id:  v.id.0,
                    unix_time_secs,
                    hardware_id: v.hardware_id.clone(),
                    parking_id:  fleet.pool.locate(v.id).map_or(u32::MAX, |p| p.0),
                    in_transit:  trip.is_some(),
                    progress:    trip.map_or(0.0, |t| t.progress(tick)),
                    distance_m:  v.distance_m,
                }
            })
            .collect();

        let result = self.writer.write_parking_stock(&parking);
        self.store_err(result);
        let result = self.writer.write_vehicles(&vehicles);
        self.store_err(result);
    }
}

pub(crate) fn realized_row(ride: &RealizedRide, start_unix_secs: i64) -> RealizedRideRow {
    let unix = |t: Tick| start_unix_secs + t.0 as i64;
    RealizedRideRow {
        ride_id:           ride.id.0,
        request_id:        ride.request.0,
        rider_id:          ride.rider.0,
        vehicle_id:        ride.vehicle.0,
        origin_id:         ride.origin.0,
        destination_id:    ride.destination.0,
        desired_unix_secs: unix(ride.desired_start),
        start_unix_secs:   unix(ride.start),
        end_unix_secs:     unix(ride.end),
        distance_m:        ride.distance_m,
        duration_secs:     ride.duration_secs,
        promo_used:        ride.promo_used,
        search_secs:       ride.search_secs,
        attempts:          ride.attempts,
    }
}

pub(crate) fn cancelled_row(ride: &CancelledRide, start_unix_secs: i64) -> CancelledRideRow {
    CancelledRideRow {
        ride_id:           ride.id.0,
        request_id:        ride.request.0,
        rider_id:          ride.rider.0,
        origin_id:         ride.origin.0,
        desired_unix_secs: start_unix_secs + ride.desired_start.0 as i64,
        search_secs:       ride.search_secs,
        attempts:          ride.attempts,
    }
}

pub(crate) fn unroutable_row(ride: &UnroutableRide, start_unix_secs: i64) -> UnroutableRideRow {
    UnroutableRideRow {
        request_id:     ride.request.0,
        rider_id:       ride.rider.0,
        vehicle_id:     ride.vehicle.0,
        origin_id:      ride.origin.0,
        destination_id: ride.destination.0,
        unix_time_secs: start_unix_secs + ride.tick.0 as i64,
        reason:         ride.reason.as_str(),
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, activity: &TickActivity, state: &SimulationState) {
        let row = TickSummaryRow {
            tick:           tick.0,
            unix_time_secs: self.unix_time(tick),
            woken:          activity.woken as u64,
            dispatched:     activity.dispatched as u64,
            live_actors:    activity.live_actors as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);

        if let Some(every) = self.snapshot_every {
            if tick >= self.next_snapshot {
                self.snapshot(tick, state);
                self.next_snapshot = Tick((tick.0 / every + 1) * every);
            }
        }
    }

    fn on_realized(&mut self, ride: &RealizedRide) {
        self.realized.push(realized_row(ride, self.start_unix_secs));
        if self.realized.len() >= self.batch_rows {
            self.flush_rides();
        }
    }

    fn on_cancelled(&mut self, ride: &CancelledRide) {
        self.cancelled.push(cancelled_row(ride, self.start_unix_secs));
        if self.cancelled.len() >= self.batch_rows {
            self.flush_rides();
        }
    }

    fn on_unroutable(&mut self, ride: &UnroutableRide) {
        self.unroutable.push(unroutable_row(ride, self.start_unix_secs));
        if self.unroutable.len() >= self.batch_rows {
            self.flush_rides();
        }
    }

    fn on_sim_end(&mut self, state: &SimulationState, summary: &RunSummary) {
        self.flush_rides();
        self.snapshot(summary.final_tick, state);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
