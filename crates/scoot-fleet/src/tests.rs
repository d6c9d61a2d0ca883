//! Unit tests for scoot-fleet.

use scoot_core::{GeoPoint, NodeId, ParkingId, RideId, RiderId, Tick, VehicleId};
use scoot_plan::{ParkingSpec, Vehicle};

use crate::{Fleet, Trip};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn spec(id: u32, capacity: u32, vehicles: &[u32], nearby: &[u32]) -> ParkingSpec {
    ParkingSpec {
        id:       ParkingId(id),
        pos:      GeoPoint::new(55.0, 37.0 + id as f64 * 0.001),
        node:     NodeId(id),
        capacity,
        nearby:   nearby.iter().copied().map(ParkingId).collect(),
        vehicles: vehicles
            .iter()
            .map(|&v| Vehicle::new(VehicleId(v), format!("SC-{v:05}")))
            .collect(),
    }
}

/// P1 [v1, v2] cap 2, P2 [] cap 3, P3 [v3] cap 1.
fn fleet() -> Fleet {
    Fleet::from_specs(&[
        spec(1, 2, &[1, 2], &[2, 3]),
        spec(2, 3, &[], &[1]),
        spec(3, 1, &[3], &[]),
    ])
    .unwrap()
}

fn trip(vehicle: u32, from: u32, to: u32, distance_m: f64) -> Trip {
    Trip {
        ride:           RideId(1),
        rider:          RiderId(1),
        vehicle:        VehicleId(vehicle),
        from_parking:   ParkingId(from),
        to_parking:     ParkingId(to),
        from_node:      NodeId(from),
        to_node:        NodeId(to),
        departure_tick: Tick(100),
        arrival_tick:   Tick(200),
        distance_m,
    }
}

// ── ParkingPool ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod pool {
    use super::*;
    use crate::FleetError;

    #[test]
    fn take_is_fifo() {
        let mut f = fleet();
        assert_eq!(f.pool.take(ParkingId(1)).unwrap(), Some(VehicleId(1)));
        assert_eq!(f.pool.take(ParkingId(1)).unwrap(), Some(VehicleId(2)));
        assert_eq!(f.pool.take(ParkingId(1)).unwrap(), None);
    }

    #[test]
    fn take_from_empty_is_none() {
        let mut f = fleet();
        assert_eq!(f.pool.take(ParkingId(2)).unwrap(), None);
    }

    #[test]
    fn put_appends_beyond_capacity() {
        let mut f = fleet();
        let v = f.pool.take(ParkingId(1)).unwrap().unwrap();
        f.pool.put(ParkingId(3), v).unwrap();
        assert_eq!(f.pool.stock_len(ParkingId(3)).unwrap(), 2);
        assert!(f.pool.is_at_capacity(ParkingId(3)).unwrap());
        assert_eq!(f.pool.stock(ParkingId(3)).unwrap(), vec![VehicleId(3), VehicleId(1)]);
        assert_eq!(f.pool.locate(v), Some(ParkingId(3)));
    }

    #[test]
    fn put_front_restores_order() {
        let mut f = fleet();
        let v = f.pool.take(ParkingId(1)).unwrap().unwrap();
        f.pool.put_front(ParkingId(1), v).unwrap();
        assert_eq!(f.pool.stock(ParkingId(1)).unwrap(), vec![VehicleId(1), VehicleId(2)]);
    }

    #[test]
    fn neighbors_keep_plan_order() {
        let f = fleet();
        assert_eq!(f.pool.neighbors(ParkingId(1)).unwrap(), &[ParkingId(2), ParkingId(3)]);
        assert!(f.pool.neighbors(ParkingId(3)).unwrap().is_empty());
    }

    #[test]
    fn capacity_queries() {
        let f = fleet();
        assert_eq!(f.pool.capacity(ParkingId(2)).unwrap(), 3);
        assert!(f.pool.is_at_capacity(ParkingId(1)).unwrap());
        assert!(!f.pool.is_at_capacity(ParkingId(2)).unwrap());
        assert_eq!(f.pool.node(ParkingId(2)).unwrap(), NodeId(2));
    }

    #[test]
    fn unknown_parking_is_error() {
        let mut f = fleet();
        assert!(matches!(f.pool.take(ParkingId(9)), Err(FleetError::UnknownParking(ParkingId(9)))));
        assert!(matches!(f.pool.stock_len(ParkingId(9)), Err(FleetError::UnknownParking(_))));
        assert!(f.pool.put(ParkingId(9), VehicleId(50)).is_err());
        // The failed put must not leave the vehicle indexed as docked.
        assert_eq!(f.pool.locate(VehicleId(50)), None);
    }

    #[test]
    #[should_panic(expected = "double release")]
    fn double_release_panics() {
        let mut f = fleet();
        f.pool.put(ParkingId(2), VehicleId(1)).unwrap();
    }

    #[test]
    fn duplicate_ids_rejected() {
        let dup_lot = Fleet::from_specs(&[spec(1, 1, &[], &[]), spec(1, 1, &[], &[])]);
        assert!(matches!(dup_lot, Err(FleetError::DuplicateParking(ParkingId(1)))));

        let dup_vehicle = Fleet::from_specs(&[spec(1, 1, &[7], &[]), spec(2, 1, &[7], &[])]);
        assert!(matches!(dup_vehicle, Err(FleetError::DuplicateVehicle(VehicleId(7)))));
    }
}

// ── Transit & Fleet ───────────────────────────────────────────────────────────

#[cfg(test)]
mod fleet {
    use super::*;

    #[test]
    fn initial_fleet_is_conserved() {
        let f = fleet();
        assert_eq!(f.vehicles.len(), 3);
        assert_eq!(f.pool.docked_count(), 3);
        assert!(f.transit.is_empty());
        assert!(f.is_conserved());
    }

    #[test]
    fn depart_and_arrive() {
        let mut f = fleet();
        let v = f.pool.take(ParkingId(1)).unwrap().unwrap();
        // Held by the ride: neither docked nor in transit.
        assert!(!f.is_conserved());

        f.depart(trip(v.0, 1, 2, 1_250.0));
        assert!(f.is_conserved());
        assert!(f.transit.in_transit(v));
        assert_eq!(f.pool.locate(v), None);

        let done = f.arrive(v).unwrap();
        assert_eq!(done.to_parking, ParkingId(2));
        assert!(f.is_conserved());
        assert_eq!(f.pool.locate(v), Some(ParkingId(2)));
        assert_eq!(f.vehicles.get(v).unwrap().distance_m, 1_250.0);
    }

    #[test]
    fn odometer_accumulates() {
        let mut f = fleet();
        for _ in 0..2 {
            let v = f.pool.take(ParkingId(3)).unwrap().unwrap();
            f.depart(trip(v.0, 3, 3, 400.0));
            f.arrive(v).unwrap();
        }
        assert_eq!(f.vehicles.get(VehicleId(3)).unwrap().distance_m, 800.0);
    }

    #[test]
    fn refund_returns_to_front() {
        let mut f = fleet();
        let v = f.pool.take(ParkingId(1)).unwrap().unwrap();
        f.refund(ParkingId(1), v).unwrap();
        assert_eq!(f.pool.take(ParkingId(1)).unwrap(), Some(v));
    }

    #[test]
    #[should_panic(expected = "still docked")]
    fn depart_docked_vehicle_panics() {
        let mut f = fleet();
        f.depart(trip(1, 1, 2, 10.0));
    }

    #[test]
    #[should_panic(expected = "without being in transit")]
    fn arrive_without_trip_panics() {
        let mut f = fleet();
        let _ = f.arrive(VehicleId(1));
    }

    #[test]
    fn trip_progress() {
        let t = trip(1, 1, 2, 0.0);
        assert_eq!(t.progress(Tick(100)), 0.0);
        assert!((t.progress(Tick(150)) - 0.5).abs() < 1e-6);
        assert_eq!(t.progress(Tick(250)), 1.0);

        let instant = Trip { arrival_tick: Tick(100), ..t };
        assert_eq!(instant.progress(Tick(100)), 1.0);
    }
}
