//! CSV plan loader.
//!
//! # CSV format
//!
//! ```csv
//! # parking.csv  (node and nearby may be empty)
//! parking_id,lat,lon,node,capacity,nearby
//! 1,55.7512,37.6184,17,20,2;5;9
//! 2,55.7530,37.6222,,10,
//!
//! # vehicles.csv  (row order = initial stock order per parking)
//! vehicle_id,hardware_id,parking_id,distance_m
//! 1,SC-00001,1,0.0
//!
//! # riders.csv
//! rider_id,name,age,speed_kmh,promo_credits,wait_limit_secs
//! 1,Anna,31,12.5,2,300
//!
//! # rides.csv
//! request_id,rider_id,origin,destination,desired_unix_secs
//! 1,1,1,2,1688198400
//! ```
//!
//! **`node`**: a parking row without a node is snapped to the nearest road
//! node.  **`nearby`**: `;`-separated parking ids; an empty list is derived
//! from the road graph (see [`crate::nearby`]).  **`speed_kmh`** is converted
//! to metres per second on load.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use scoot_core::{GeoPoint, NodeId, ParkingId, RequestId, RiderId, VehicleId};
use scoot_spatial::RoadNetwork;

use crate::model::{ParkingSpec, RideRequest, Rider, SimulationPlan, Vehicle};
use crate::nearby::{assign_nearby, DEFAULT_NEARBY_COUNT};
use crate::{PlanError, PlanResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ParkingRecord {
    parking_id: u32,
    lat:        f64,
    lon:        f64,
    #[serde(default)]
    node:       Option<u32>,
    capacity:   u32,
    #[serde(default)]
    nearby:     Option<String>,
}

#[derive(Deserialize)]
struct VehicleRecord {
    vehicle_id:  u32,
    hardware_id: String,
    parking_id:  u32,
    #[serde(default)]
    distance_m:  Option<f64>,
}

#[derive(Deserialize)]
struct RiderRecord {
    rider_id:        u32,
    name:            String,
    age:             u16,
    speed_kmh:       f32,
    promo_credits:   u32,
    wait_limit_secs: u64,
}

#[derive(Deserialize)]
struct RideRecord {
    request_id:        u32,
    rider_id:          u32,
    origin:            u32,
    destination:       u32,
    desired_unix_secs: i64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a complete plan from the four CSV files in `dir`.
///
/// Vehicles are attached to their parking, missing nearby lists are derived
/// from `network`, and rides are stable-sorted by desired start.
pub fn load_plan_dir(
    dir: &Path,
    network: &RoadNetwork,
    start_unix_secs: i64,
    end_unix_secs: i64,
) -> PlanResult<SimulationPlan> {
    let open = |name: &str| std::fs::File::open(dir.join(name));

    let mut parking = load_parking_reader(open("parking.csv")?, network)?;
    let vehicles = load_vehicles_reader(open("vehicles.csv")?)?;
    attach_vehicles(&mut parking, vehicles)?;
    let derived = assign_nearby(&mut parking, network, DEFAULT_NEARBY_COUNT);

    let mut plan = SimulationPlan {
        start_unix_secs,
        end_unix_secs,
        riders: load_riders_reader(open("riders.csv")?)?,
        parking,
        rides: load_rides_reader(open("rides.csv")?)?,
    };
    if !plan.rides_sorted() {
        log::debug!("rides.csv is not in time order; sorting {} requests", plan.rides.len());
        plan.sort_rides();
    }

    log::info!(
        "loaded plan from {}: {} riders, {} parking ({} derived nearby lists), {} vehicles, {} rides",
        dir.display(),
        plan.riders.len(),
        plan.parking.len(),
        derived,
        plan.vehicle_count(),
        plan.rides.len(),
    );
    Ok(plan)
}

/// Parse parking rows.  Returned specs carry no vehicles yet.
pub fn load_parking_reader<R: Read>(reader: R, network: &RoadNetwork) -> PlanResult<Vec<ParkingSpec>> {
    read_rows::<ParkingRecord, _>(reader)?
        .into_iter()
        .map(|r| {
            let id  = ParkingId(r.parking_id);
            let pos = GeoPoint::new(r.lat, r.lon);
            let node = match r.node {
                Some(n) => NodeId(n),
                None => network.snap_to_node(pos).ok_or(PlanError::Unsnappable(id))?,
            };
            Ok(ParkingSpec {
                id,
                pos,
                node,
                capacity: r.capacity,
                nearby:   parse_nearby(r.nearby.as_deref().unwrap_or(""))?,
                vehicles: Vec::new(),
            })
        })
        .collect()
}

/// Parse vehicle rows as `(parking, vehicle)` pairs in file order.
pub fn load_vehicles_reader<R: Read>(reader: R) -> PlanResult<Vec<(ParkingId, Vehicle)>> {
    Ok(read_rows::<VehicleRecord, _>(reader)?
        .into_iter()
        .map(|r| {
            let vehicle = Vehicle {
                id:          VehicleId(r.vehicle_id),
                hardware_id: r.hardware_id,
                distance_m:  r.distance_m.unwrap_or(0.0),
            };
            (ParkingId(r.parking_id), vehicle)
        })
        .collect())
}

pub fn load_riders_reader<R: Read>(reader: R) -> PlanResult<Vec<Rider>> {
    Ok(read_rows::<RiderRecord, _>(reader)?
        .into_iter()
        .map(|r| Rider {
            id:              RiderId(r.rider_id),
            name:            r.name,
            age:             r.age,
            speed_mps:       Rider::kmh_to_mps(r.speed_kmh),
            promo_credits:   r.promo_credits,
            wait_limit_secs: r.wait_limit_secs,
        })
        .collect())
}

/// Parse ride rows in file order (not sorted).
pub fn load_rides_reader<R: Read>(reader: R) -> PlanResult<Vec<RideRequest>> {
    Ok(read_rows::<RideRecord, _>(reader)?
        .into_iter()
        .map(|r| RideRequest {
            id:                RequestId(r.request_id),
            rider:             RiderId(r.rider_id),
            origin:            ParkingId(r.origin),
            destination:       ParkingId(r.destination),
            desired_unix_secs: r.desired_unix_secs,
        })
        .collect())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_rows<T: DeserializeOwned, R: Read>(reader: R) -> PlanResult<Vec<T>> {
    csv::Reader::from_reader(reader)
        .deserialize::<T>()
        .map(|row| row.map_err(|e| PlanError::Parse(e.to_string())))
        .collect()
}

fn parse_nearby(s: &str) -> PlanResult<Vec<ParkingId>> {
    s.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<u32>().map(ParkingId).map_err(|_| {
                PlanError::Parse(format!("invalid nearby parking id {t:?}: expected u32"))
            })
        })
        .collect()
}

fn attach_vehicles(parking: &mut [ParkingSpec], vehicles: Vec<(ParkingId, Vehicle)>) -> PlanResult<()> {
    let slot: HashMap<ParkingId, usize> =
        parking.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    for (at, vehicle) in vehicles {
        let &i = slot
            .get(&at)
            .ok_or(PlanError::UnknownParking { vehicle: vehicle.id, parking: at })?;
        parking[i].vehicles.push(vehicle);
    }
    Ok(())
}
