//! Unit tests for scoot-plan.

use scoot_core::{GeoPoint, NodeId, ParkingId};
use scoot_spatial::{RoadNetwork, RoadNetworkBuilder};

use crate::ParkingSpec;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Straight street n0 – n1 – n2 – n3 along a meridian, ~111 m per hop.
fn street() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    let nodes: Vec<NodeId> = (0..4)
        .map(|i| b.add_node(GeoPoint::new(55.0 + i as f64 * 0.001, 37.0)))
        .collect();
    for w in nodes.windows(2) {
        b.add_road(w[0], w[1], 111.0, 20_000);
    }
    b.build()
}

fn spec(id: u32, node: u32, nearby: &[u32]) -> ParkingSpec {
    ParkingSpec {
        id:       ParkingId(id),
        pos:      GeoPoint::new(55.0 + node as f64 * 0.001, 37.0),
        node:     NodeId(node),
        capacity: 10,
        nearby:   nearby.iter().copied().map(ParkingId).collect(),
        vehicles: Vec::new(),
    }
}

fn ids(v: &[ParkingId]) -> Vec<u32> {
    v.iter().map(|p| p.0).collect()
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use scoot_core::{ParkingId, RequestId, RiderId, VehicleId};

    use crate::{RideRequest, Rider, SimulationPlan, Vehicle};

    fn request(id: u32, at: i64) -> RideRequest {
        RideRequest {
            id:                RequestId(id),
            rider:             RiderId(1),
            origin:            ParkingId(1),
            destination:       ParkingId(2),
            desired_unix_secs: at,
        }
    }

    #[test]
    fn kmh_conversion() {
        assert!((Rider::kmh_to_mps(36.0) - 10.0).abs() < 1e-5);
        assert!((Rider::kmh_to_mps(18.0) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn window_and_counts() {
        let mut plan = SimulationPlan::new(1_000, 4_600);
        assert_eq!(plan.window_secs(), 3_600);
        plan.parking.push(super::spec(1, 0, &[]));
        plan.parking[0].vehicles.push(Vehicle::new(VehicleId(1), "SC-1"));
        plan.parking[0].vehicles.push(Vehicle::new(VehicleId(2), "SC-2"));
        assert_eq!(plan.vehicle_count(), 2);

        assert_eq!(SimulationPlan::new(10, 5).window_secs(), 0);
    }

    #[test]
    fn sort_rides_is_stable() {
        let mut plan = SimulationPlan::new(0, 100);
        plan.rides = vec![request(1, 50), request(2, 10), request(3, 50), request(4, 10)];
        assert!(!plan.rides_sorted());
        plan.sort_rides();
        assert!(plan.rides_sorted());
        let order: Vec<u32> = plan.rides.iter().map(|r| r.id.0).collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }
}

// ── Nearby assignment ─────────────────────────────────────────────────────────

#[cfg(test)]
mod nearby {
    use super::{ids, spec, street};
    use crate::{assign_nearby, DEFAULT_NEARBY_COUNT};

    #[test]
    fn same_node_first_then_adjacent() {
        let net = street();
        let mut parking = vec![
            spec(1, 0, &[]),
            spec(2, 0, &[]),
            spec(3, 1, &[]),
            spec(4, 2, &[]),
            spec(5, 3, &[4]),
        ];
        let filled = assign_nearby(&mut parking, &net, DEFAULT_NEARBY_COUNT);
        assert_eq!(filled, 4);

        assert_eq!(ids(&parking[0].nearby), vec![2, 3]);
        assert_eq!(ids(&parking[1].nearby), vec![1, 3]);
        assert_eq!(ids(&parking[2].nearby), vec![1, 2, 4]);
        assert_eq!(ids(&parking[3].nearby), vec![3, 5]);
        // Preset list untouched.
        assert_eq!(ids(&parking[4].nearby), vec![4]);
    }

    #[test]
    fn respects_k() {
        let net = street();
        let mut parking = vec![spec(1, 1, &[]), spec(2, 1, &[]), spec(3, 0, &[]), spec(4, 2, &[])];
        assign_nearby(&mut parking, &net, 1);
        assert_eq!(ids(&parking[0].nearby), vec![2]);
        assert_eq!(ids(&parking[2].nearby), vec![1]);
    }

    #[test]
    fn isolated_parking_stays_empty() {
        let net = street();
        let mut parking = vec![spec(1, 0, &[]), spec(2, 3, &[])];
        let filled = assign_nearby(&mut parking, &net, DEFAULT_NEARBY_COUNT);
        assert_eq!(filled, 0);
        assert!(parking[0].nearby.is_empty());
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use scoot_core::{NodeId, ParkingId, RiderId, VehicleId};
    use scoot_spatial::RoadNetwork;

    use super::{ids, street};
    use crate::{
        load_parking_reader, load_plan_dir, load_riders_reader, load_rides_reader,
        load_vehicles_reader, PlanError,
    };

    const PARKING: &str = "\
parking_id,lat,lon,node,capacity,nearby
1,55.000,37.0,0,5,2
2,55.001,37.0,,5,
3,55.0029,37.0,,4,1; 2
";

    #[test]
    fn parking_rows_snap_and_parse_nearby() {
        let net = street();
        let parking = load_parking_reader(Cursor::new(PARKING), &net).unwrap();
        assert_eq!(parking.len(), 3);
        assert_eq!(parking[0].node, NodeId(0));
        assert_eq!(parking[1].node, NodeId(1));
        assert_eq!(parking[2].node, NodeId(3));
        assert_eq!(ids(&parking[0].nearby), vec![2]);
        assert!(parking[1].nearby.is_empty());
        assert_eq!(ids(&parking[2].nearby), vec![1, 2]);
        assert_eq!(parking[2].capacity, 4);
    }

    #[test]
    fn parking_without_node_on_empty_network_fails() {
        let result = load_parking_reader(Cursor::new(PARKING), &RoadNetwork::empty());
        assert!(matches!(result, Err(PlanError::Unsnappable(ParkingId(2)))));
    }

    #[test]
    fn bad_nearby_list_is_parse_error() {
        let csv = "parking_id,lat,lon,node,capacity,nearby\n1,55.0,37.0,0,5,x\n";
        let result = load_parking_reader(Cursor::new(csv), &street());
        assert!(matches!(result, Err(PlanError::Parse(_))));
    }

    #[test]
    fn riders_convert_speed() {
        let csv = "rider_id,name,age,speed_kmh,promo_credits,wait_limit_secs\n7,Anna,31,36.0,2,300\n";
        let riders = load_riders_reader(Cursor::new(csv)).unwrap();
        assert_eq!(riders[0].id, RiderId(7));
        assert!((riders[0].speed_mps - 10.0).abs() < 1e-5);
        assert_eq!(riders[0].promo_credits, 2);
        assert_eq!(riders[0].wait_limit_secs, 300);
    }

    #[test]
    fn vehicles_default_odometer() {
        let csv = "vehicle_id,hardware_id,parking_id,distance_m\n1,SC-1,2,\n2,SC-2,2,1500.5\n";
        let vehicles = load_vehicles_reader(Cursor::new(csv)).unwrap();
        assert_eq!(vehicles[0].0, ParkingId(2));
        assert_eq!(vehicles[0].1.distance_m, 0.0);
        assert_eq!(vehicles[1].1.id, VehicleId(2));
        assert_eq!(vehicles[1].1.distance_m, 1500.5);
    }

    #[test]
    fn rides_keep_file_order() {
        let csv = "request_id,rider_id,origin,destination,desired_unix_secs\n1,1,1,2,200\n2,1,2,1,100\n";
        let rides = load_rides_reader(Cursor::new(csv)).unwrap();
        assert_eq!(rides[0].desired_unix_secs, 200);
        assert_eq!(rides[1].desired_unix_secs, 100);
    }

    fn write_plan(dir: &std::path::Path, vehicles: &str) {
        std::fs::write(dir.join("parking.csv"), PARKING).unwrap();
        std::fs::write(dir.join("vehicles.csv"), vehicles).unwrap();
        std::fs::write(
            dir.join("riders.csv"),
            "rider_id,name,age,speed_kmh,promo_credits,wait_limit_secs\n1,Anna,31,18.0,0,60\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("rides.csv"),
            "request_id,rider_id,origin,destination,desired_unix_secs\n\
             1,1,1,2,1500\n2,1,2,3,1200\n3,1,3,1,1500\n",
        )
        .unwrap();
    }

    #[test]
    fn load_dir_assembles_plan() {
        let dir = tempfile::tempdir().unwrap();
        write_plan(
            dir.path(),
            "vehicle_id,hardware_id,parking_id,distance_m\n1,SC-1,1,0\n2,SC-2,1,0\n3,SC-3,3,0\n",
        );
        let plan = load_plan_dir(dir.path(), &street(), 1_000, 2_000).unwrap();

        assert_eq!(plan.start_unix_secs, 1_000);
        assert_eq!(plan.vehicle_count(), 3);
        let stock: Vec<u32> = plan.parking[0].vehicles.iter().map(|v| v.id.0).collect();
        assert_eq!(stock, vec![1, 2]);

        // Parking 2 (node 1) had no list: derived from adjacent nodes 0 and 2.
        assert_eq!(ids(&plan.parking[1].nearby), vec![1]);

        // Stable time order.
        let order: Vec<u32> = plan.rides.iter().map(|r| r.id.0).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn load_dir_rejects_vehicle_at_unknown_parking() {
        let dir = tempfile::tempdir().unwrap();
        write_plan(dir.path(), "vehicle_id,hardware_id,parking_id,distance_m\n1,SC-1,9,0\n");
        let result = load_plan_dir(dir.path(), &street(), 0, 10);
        assert!(matches!(
            result,
            Err(PlanError::UnknownParking { vehicle: VehicleId(1), parking: ParkingId(9) })
        ));
    }

    #[test]
    fn load_dir_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_plan_dir(dir.path(), &street(), 0, 10);
        assert!(matches!(result, Err(PlanError::Io(_))));
    }
}
