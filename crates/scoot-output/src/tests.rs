//! Integration tests for scoot-output.

use tempfile::TempDir;

use crate::row::{
    CancelledRideRow, ParkingStockRow, RealizedRideRow, TickSummaryRow, UnroutableRideRow, VehicleRow,
};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn realized_row(ride_id: u32) -> RealizedRideRow {
    RealizedRideRow {
        ride_id,
        request_id:        ride_id + 100,
        rider_id:          7,
        vehicle_id:        3,
        origin_id:         1,
        destination_id:    2,
        desired_unix_secs: 1_000,
        start_unix_secs:   1_010,
        end_unix_secs:     1_110,
        distance_m:        1000.0,
        duration_secs:     100,
        promo_used:        true,
        search_secs:       10,
        attempts:          1,
    }
}

fn cancelled_row(ride_id: u32) -> CancelledRideRow {
    CancelledRideRow {
        ride_id,
        request_id:        ride_id + 200,
        rider_id:          8,
        origin_id:         4,
        desired_unix_secs: 2_000,
        search_secs:       300,
        attempts:          0,
    }
}

fn unroutable_row(request_id: u32) -> UnroutableRideRow {
    UnroutableRideRow {
        request_id,
        rider_id:       9,
        vehicle_id:     5,
        origin_id:      1,
        destination_id: 6,
        unix_time_secs: 3_000,
        reason:         "no_route",
    }
}

fn vehicle_row(vehicle_id: u32, in_transit: bool) -> VehicleRow {
    VehicleRow {
        vehicle_id,
        unix_time_secs: 5_000,
        hardware_id:    format!("hw-{vehicle_id}"),
        parking_id:     if in_transit { u32::MAX } else { 1 },
        in_transit,
        progress:       if in_transit { 0.5 } else { 0.0 },
        distance_m:     250.0,
    }
}

fn parking_row(parking_id: u32) -> ParkingStockRow {
    ParkingStockRow { parking_id, unix_time_secs: 5_000, lat: 48.1, lon: 11.5, capacity: 10, stock: 3 }
}

fn tick_row(tick: u64) -> TickSummaryRow {
    TickSummaryRow { tick, unix_time_secs: 1_000 + tick as i64, woken: 2, dispatched: 1, live_actors: 3 }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;

    use crate::csv::{CsvWriter, CANCELLED_HEADER, REALIZED_HEADER, UNROUTABLE_HEADER, VEHICLE_HEADER};
    use crate::writer::OutputWriter;
    use crate::OutputError;

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        for name in [
            "realized_rides", "cancelled_rides", "unroutable_rides", "parking_stock", "vehicles",
            "tick_summaries",
        ] {
            assert!(dir.path().join(format!("{name}.csv")).exists(), "{name}.csv missing");
        }
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("realized_rides.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(dir.path().join("realized_rides.csv")), REALIZED_HEADER);
        assert_eq!(headers(dir.path().join("cancelled_rides.csv")), CANCELLED_HEADER);
        assert_eq!(headers(dir.path().join("vehicles.csv")), VEHICLE_HEADER);
        assert_eq!(headers(dir.path().join("unroutable_rides.csv")), UNROUTABLE_HEADER);
    }

    #[test]
    fn csv_unroutable_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_unroutable(&[unroutable_row(4)]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("unroutable_rides.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "4");
        assert_eq!(&rows[0][2], "5");
        assert_eq!(&rows[0][4], "6");
        assert_eq!(&rows[0][6], "no_route");
    }

    #[test]
    fn csv_realized_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_realized(&[realized_row(1), realized_row(2)]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("realized_rides.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");       // ride_id
        assert_eq!(&rows[0][1], "101");     // request_id
        assert_eq!(&rows[0][9], "1000.0");  // distance_m
        assert_eq!(&rows[0][11], "1");      // promo_used
        assert_eq!(&rows[1][0], "2");
    }

    #[test]
    fn csv_vehicle_in_transit_has_no_parking() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_vehicles(&[vehicle_row(1, false), vehicle_row(2, true)]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("vehicles.csv"));
        assert_eq!(&rows[0][3], "1");
        assert_eq!(&rows[0][4], "0");
        assert_eq!(&rows[1][2], "hw-2");
        assert_eq!(&rows[1][3], u32::MAX.to_string().as_str());
        assert_eq!(&rows[1][5], "0.500");
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&tick_row(3)).unwrap();
        w.write_cancelled(&[cancelled_row(1)]).unwrap();
        w.write_parking_stock(&[parking_row(9)]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("tick_summaries.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][1], "1003");
        assert_eq!(records(dir.path().join("cancelled_rides.csv")).len(), 1);
        assert_eq!(&records(dir.path().join("parking_stock.csv"))[0][0], "9");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_write_after_finish_errors() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        let err = w.write_realized(&[realized_row(1)]).unwrap_err();
        assert!(matches!(err, OutputError::Finished { table: "realized_rides" }));
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_realized(&[]).unwrap();
        w.write_vehicles(&[]).unwrap();
    }
}

// ── SimOutputObserver ─────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    use scoot_core::{GeoPoint, NodeId, ParkingId, RequestId, RiderId, VehicleId};
    use scoot_plan::{ParkingSpec, RideRequest, Rider, SimulationPlan, Vehicle};
    use scoot_sim::{Sim, SimBuilder};
    use scoot_spatial::{DijkstraRouter, RoadNetworkBuilder};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    const START: i64 = 1_600_000_000;

    fn lot(id: u32, node: u32, vehicles: &[u32]) -> ParkingSpec {
        ParkingSpec {
            id:       ParkingId(id),
            pos:      GeoPoint::new(0.0, 0.001 * id as f64),
            node:     NodeId(node),
            capacity: 5,
            nearby:   vec![],
            vehicles: vehicles.iter().map(|&v| Vehicle::new(VehicleId(v), format!("hw-{v}"))).collect(),
        }
    }

    /// Rider 1 rides 1 km at 10 m/s from lot 1 to lot 2 at t=0; rider 2
    /// waits at the empty lot 3 until it gives up at t=60.
    fn small_sim() -> Sim<DijkstraRouter> {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.009, 0.0));
        b.add_road(n0, n1, 1000.0, 200_000);

        let rider = |id: u32, wait: u64| Rider {
            id:              RiderId(id),
            name:            format!("r{id}"),
            age:             40,
            speed_mps:       10.0,
            promo_credits:   0,
            wait_limit_secs: wait,
        };
        let request = |id: u32, rider: u32, origin: u32, destination: u32| RideRequest {
            id:                RequestId(id),
            rider:             RiderId(rider),
            origin:            ParkingId(origin),
            destination:       ParkingId(destination),
            desired_unix_secs: START,
        };
        let plan = SimulationPlan {
            riders:  vec![rider(1, 60), rider(2, 60)],
            parking: vec![lot(1, 0, &[1, 2]), lot(2, 1, &[]), lot(3, 1, &[])],
            rides:   vec![request(1, 1, 1, 2), request(2, 2, 3, 1)],
            ..SimulationPlan::new(START, START + 3_600)
        };
        SimBuilder::from_plan(plan, DijkstraRouter).network(b.build()).build().unwrap()
    }

    /// Rider 3 takes vehicle 1 towards lot 4, whose node has no roads.
    fn stranded_sim() -> Sim<DijkstraRouter> {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.009, 0.0));
        b.add_node(GeoPoint::new(0.5, 0.5));
        b.add_road(n0, n1, 1000.0, 200_000);

        let plan = SimulationPlan {
            riders:  vec![Rider {
                id:              RiderId(3),
                name:            "r3".into(),
                age:             30,
                speed_mps:       5.0,
                promo_credits:   0,
                wait_limit_secs: 60,
            }],
            parking: vec![lot(1, 0, &[1]), lot(4, 2, &[])],
            rides:   vec![RideRequest {
                id:                RequestId(9),
                rider:             RiderId(3),
                origin:            ParkingId(1),
                destination:       ParkingId(4),
                desired_unix_secs: START + 20,
            }],
            ..SimulationPlan::new(START, START + 3_600)
        };
        SimBuilder::from_plan(plan, DijkstraRouter).network(b.build()).build().unwrap()
    }

    fn count(dir: &TempDir, name: &str) -> usize {
        let mut rdr = csv::Reader::from_path(dir.path().join(name)).unwrap();
        rdr.records().count()
    }

    #[test]
    fn integration_csv() {
        let mut sim = small_sim();
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &sim.config);
        let summary = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        assert_eq!(count(&dir, "realized_rides.csv"), summary.realized);
        assert_eq!(count(&dir, "cancelled_rides.csv"), summary.cancelled);
        assert_eq!((summary.realized, summary.cancelled), (1, 1));
        // End-of-run snapshot only: 3 lots, 2 vehicles.
        assert_eq!(count(&dir, "parking_stock.csv"), 3);
        assert_eq!(count(&dir, "vehicles.csv"), 2);

        let mut rdr = csv::Reader::from_path(dir.path().join("realized_rides.csv")).unwrap();
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[6], START.to_string().as_str());           // desired
        assert_eq!(&row[8], (START + 100).to_string().as_str());   // end
    }

    #[test]
    fn periodic_snapshots_follow_the_interval() {
        let mut sim = small_sim();
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &sim.config).with_snapshot_interval(50);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        // Ticks processed: 0, 10, …, 60 (probes) and 100 (arrival).
        // Snapshots at 0, 50 and 100, plus the end-of-run one.
        assert_eq!(count(&dir, "vehicles.csv"), 4 * 2);
        assert_eq!(count(&dir, "tick_summaries.csv"), 8);

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicles.csv")).unwrap();
        let first: Vec<_> = rdr.records().take(2).map(|r| r.unwrap()).collect();
        // At tick 0 vehicle 1 has just left lot 1.
        assert_eq!(&first[0][0], "1");
        assert_eq!(&first[0][4], "1");
        assert_eq!(&first[1][3], "1");
    }

    #[test]
    fn small_batches_write_every_ride() {
        let mut sim = small_sim();
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &sim.config).with_batch_rows(1);
        sim.run(&mut obs).unwrap();
        assert_eq!(count(&dir, "realized_rides.csv"), 1);
        assert_eq!(count(&dir, "cancelled_rides.csv"), 1);
    }

    #[test]
    fn unroutable_rides_reach_their_own_table() {
        let mut sim = stranded_sim();
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &sim.config);
        let summary = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());
        assert_eq!(summary.unroutable, 1);

        assert_eq!(count(&dir, "realized_rides.csv"), 0);
        let mut rdr = csv::Reader::from_path(dir.path().join("unroutable_rides.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "9");
        assert_eq!(&rows[0][1], "3");
        assert_eq!(&rows[0][2], "1");
        assert_eq!(&rows[0][3], "1");
        assert_eq!(&rows[0][4], "4");
        assert_eq!(&rows[0][5], (START + 20).to_string().as_str());
        assert_eq!(&rows[0][6], "no_route");
    }

    /// Fails every tick-summary write and counts the rest.
    #[derive(Default)]
    struct FailingWriter {
        rides:    usize,
        finished: bool,
    }

    impl OutputWriter for FailingWriter {
        fn write_realized(&mut self, rows: &[crate::RealizedRideRow]) -> OutputResult<()> {
            self.rides += rows.len();
            Ok(())
        }
        fn write_cancelled(&mut self, rows: &[crate::CancelledRideRow]) -> OutputResult<()> {
            self.rides += rows.len();
            Ok(())
        }
        fn write_unroutable(&mut self, rows: &[UnroutableRideRow]) -> OutputResult<()> {
            self.rides += rows.len();
            Ok(())
        }
        fn write_parking_stock(&mut self, _: &[crate::ParkingStockRow]) -> OutputResult<()> {
            Ok(())
        }
        fn write_vehicles(&mut self, _: &[crate::VehicleRow]) -> OutputResult<()> {
            Ok(())
        }
        fn write_tick_summary(&mut self, _: &crate::TickSummaryRow) -> OutputResult<()> {
            Err(OutputError::Finished { table: "tick_summaries" })
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn first_error_is_kept_and_run_continues() {
        let mut sim = small_sim();
        let mut obs = SimOutputObserver::new(FailingWriter::default(), &sim.config);
        sim.run(&mut obs).unwrap();

        assert!(matches!(obs.take_error(), Some(OutputError::Finished { .. })));
        assert!(obs.take_error().is_none());
        let writer = obs.into_writer();
        assert_eq!(writer.rides, 2);
        assert!(writer.finished);
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;

    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn open(dir: &TempDir) -> rusqlite::Connection {
        rusqlite::Connection::open(dir.path().join("output.db")).unwrap()
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_realized_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_realized(&[realized_row(1), realized_row(2), realized_row(3)]).unwrap();
        w.finish().unwrap();

        let count: i64 = open(&dir)
            .query_row("SELECT COUNT(*) FROM realized_rides", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_booleans_as_integers() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_vehicles(&[vehicle_row(4, true)]).unwrap();
        w.finish().unwrap();

        let (in_transit, parking): (i64, i64) = open(&dir)
            .query_row("SELECT in_transit, parking_id FROM vehicles WHERE vehicle_id = 4", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(in_transit, 1);
        // SQLite INTEGER is signed 64-bit; u32::MAX fits without loss.
        assert_eq!(parking, u32::MAX as i64);
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&tick_row(7)).unwrap();
        w.write_cancelled(&[cancelled_row(1)]).unwrap();
        w.write_parking_stock(&[parking_row(2)]).unwrap();
        w.finish().unwrap();

        let conn = open(&dir);
        let (unix_time, live): (i64, i64) = conn
            .query_row(
                "SELECT unix_time_secs, live_actors FROM tick_summaries WHERE tick = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!((unix_time, live), (1_007, 3));
        let search: i64 = conn
            .query_row("SELECT search_secs FROM cancelled_rides WHERE ride_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(search, 300);
    }

    #[test]
    fn sqlite_unroutable_reason_is_text() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_unroutable(&[unroutable_row(2)]).unwrap();
        w.finish().unwrap();

        let reason: String = open(&dir)
            .query_row("SELECT reason FROM unroutable_rides WHERE request_id = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(reason, "no_route");
    }
}

// ── Parquet ───────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use super::*;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        for name in [
            "realized_rides", "cancelled_rides", "unroutable_rides", "parking_stock", "vehicles",
            "tick_summaries",
        ] {
            assert!(dir.path().join(format!("{name}.parquet")).exists(), "{name}.parquet missing");
        }
    }

    #[test]
    fn parquet_realized_rows_read_back() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_realized(&[realized_row(1), realized_row(2)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("realized_rides.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let total_rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);
        assert_eq!(*schema.field_with_name("promo_used").unwrap().data_type(), DataType::Boolean);
        assert_eq!(schema.fields().len(), 14);
    }

    #[test]
    fn parquet_hardware_id_is_utf8() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_vehicles(&[vehicle_row(1, false)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("vehicles.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        assert_eq!(*builder.schema().field_with_name("hardware_id").unwrap().data_type(), DataType::Utf8);
    }

    #[test]
    fn parquet_write_after_finish_errors() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        assert!(w.write_tick_summary(&tick_row(1)).is_err());
    }

    #[test]
    fn parquet_finish_required() {
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_cancelled(&[cancelled_row(1)]).unwrap();
            // Dropped without finish(): no footer is written.
        }

        let file = std::fs::File::open(dir.path().join("cancelled_rides.parquet")).unwrap();
        assert!(ParquetRecordBatchReaderBuilder::try_new(file).is_err());
    }
}
