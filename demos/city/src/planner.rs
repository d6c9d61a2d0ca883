//! Seeded toy planner.
//!
//! Puts one parking location on every grid node, scatters the fleet over
//! them, draws a rider population and a day of uniformly timed rides.  Only
//! meant for smoke runs and replicate sweeps; real plans come from CSV.

use scoot_core::{NodeId, ParkingId, RequestId, RiderId, SimRng, VehicleId};
use scoot_plan::{
    assign_nearby, ParkingSpec, RideRequest, Rider, SimulationPlan, Vehicle, DEFAULT_NEARBY_COUNT,
};
use scoot_spatial::RoadNetwork;

const NAMES: [&str; 8] = ["Anna", "Ben", "Clara", "David", "Elif", "Felix", "Greta", "Hamid"];

/// Sizes of a synthesized plan.
#[derive(Clone, Copy, Debug)]
pub struct ToyPlanParams {
    pub riders:   usize,
    pub rides:    usize,
    /// Vehicles per parking location on average.
    pub fleet_per_lot: f64,
}

pub fn synthesize(
    network: &RoadNetwork,
    nodes: &[NodeId],
    params: ToyPlanParams,
    start_unix_secs: i64,
    end_unix_secs: i64,
    rng: &mut SimRng,
) -> SimulationPlan {
    let window = end_unix_secs.saturating_sub(start_unix_secs).max(1);

    // ── Parking and vehicles ──────────────────────────────────────────────
    let mut next_vehicle = 1u32;
    let mut parking: Vec<ParkingSpec> = nodes
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let capacity: u32 = rng.gen_range(4..=12);
            let max_stock = (params.fleet_per_lot * 2.0).round().max(0.0) as u32;
            let stock = rng.gen_range(0..=max_stock).min(capacity);
            let vehicles = (0..stock)
                .map(|_| {
                    let id = next_vehicle;
                    next_vehicle += 1;
                    Vehicle::new(VehicleId(id), format!("SC-{id:05}"))
                })
                .collect();
            ParkingSpec {
                id:       ParkingId(i as u32 + 1),
                pos:      network.node_pos[node.index()],
                node,
                capacity,
                nearby:   Vec::new(),
                vehicles,
            }
        })
        .collect();
    assign_nearby(&mut parking, network, DEFAULT_NEARBY_COUNT);

    // ── Riders ────────────────────────────────────────────────────────────
    let riders: Vec<Rider> = (1..=params.riders as u32)
        .map(|id| Rider {
            id:              RiderId(id),
            name:            format!("{} {id}", rng.choose(&NAMES).copied().unwrap_or("Rider")),
            age:             rng.gen_range(16..=75),
            speed_mps:       Rider::kmh_to_mps(rng.gen_range(12.0..22.0)),
            promo_credits:   if rng.gen_bool(0.3) { rng.gen_range(1..=3) } else { 0 },
            wait_limit_secs: rng.gen_range(2..=10) * 60,
        })
        .collect();

    // ── Rides ─────────────────────────────────────────────────────────────
    let mut rides: Vec<RideRequest> = Vec::with_capacity(params.rides);
    if !riders.is_empty() && parking.len() >= 2 {
        for id in 1..=params.rides as u32 {
            let rider = riders[rng.gen_range(0..riders.len())].id;
            let origin = rng.gen_range(0..parking.len());
            let mut destination = rng.gen_range(0..parking.len() - 1);
            if destination >= origin {
                destination += 1;
            }
            rides.push(RideRequest {
                id:                RequestId(id),
                rider,
                origin:            parking[origin].id,
                destination:       parking[destination].id,
                desired_unix_secs: start_unix_secs + rng.gen_range(0..window),
            });
        }
    }

    let mut plan = SimulationPlan { riders, parking, rides, ..SimulationPlan::new(start_unix_secs, end_unix_secs) };
    plan.sort_rides();
    plan
}

/// Seed of replicate `i`.  Running with this as `--seed` and a single
/// replicate reproduces that replicate's plan.
pub fn replicate_seed(base: u64, replicate: usize) -> u64 {
    base.wrapping_add(replicate as u64)
}

/// One plan per replicate, each tagged with the seed it was drawn from.
pub fn toy_plans(
    network: &RoadNetwork,
    nodes: &[NodeId],
    params: ToyPlanParams,
    base_seed: u64,
    replicates: usize,
    start_unix_secs: i64,
    end_unix_secs: i64,
) -> Vec<(u64, SimulationPlan)> {
    (0..replicates.max(1))
        .map(|i| {
            let seed = replicate_seed(base_seed, i);
            let mut rng = SimRng::new(seed);
            (seed, synthesize(network, nodes, params, start_unix_secs, end_unix_secs, &mut rng))
        })
        .collect()
}
