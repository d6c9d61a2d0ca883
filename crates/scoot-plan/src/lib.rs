//! `scoot-plan` — the Simulation Plan Provider.
//!
//! A plan is everything the engine needs before tick 0: who rides, where the
//! parking spots are, which scooters stand where, and the ordered list of
//! ride requests.  How a plan is *synthesized* is not this crate's business;
//! it only models plans and loads them from CSV.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`model`]   | `Rider`, `Vehicle`, `ParkingSpec`, `RideRequest`, `SimulationPlan` |
//! | [`loader`]  | `load_plan_dir` plus per-file `*_reader` loaders             |
//! | [`nearby`]  | `assign_nearby`: overflow neighbours from the road graph     |
//! | [`error`]   | `PlanError`, `PlanResult<T>`                                 |
//!
//! # Directory format (summary)
//!
//! ```text
//! plan/
//!   parking.csv   parking_id,lat,lon,node,capacity,nearby
//!   vehicles.csv  vehicle_id,hardware_id,parking_id,distance_m
//!   riders.csv    rider_id,name,age,speed_kmh,promo_credits,wait_limit_secs
//!   rides.csv     request_id,rider_id,origin,destination,desired_unix_secs
//! ```

pub mod error;
pub mod loader;
pub mod model;
pub mod nearby;

#[cfg(test)]
mod tests;

pub use error::{PlanError, PlanResult};
pub use loader::{
    load_parking_reader, load_plan_dir, load_riders_reader, load_rides_reader,
    load_vehicles_reader,
};
pub use model::{ParkingSpec, RideRequest, Rider, SimulationPlan, Vehicle};
pub use nearby::{assign_nearby, DEFAULT_NEARBY_COUNT};
