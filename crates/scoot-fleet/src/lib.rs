//! `scoot-fleet` — the Parking Resource Pool and everything that owns a
//! vehicle.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`parking`] | `ParkingLot` — one location's FIFO stock and overflow neighbours  |
//! | [`pool`]    | `ParkingPool` — take/put/neighbors over all lots                  |
//! | [`vehicle`] | `VehicleRegistry` — hardware ids and odometers                    |
//! | [`transit`] | `Trip`, `TransitStore` — vehicles currently on a ride             |
//! | [`fleet`]   | `Fleet` — pool + registry + transit with depart/arrive            |
//! | [`error`]   | `FleetError`, `FleetResult<T>`                                    |
//!
//! # Ownership model
//!
//! At every instant a vehicle is in exactly one place: the stock of one
//! parking lot, or the transit ledger.  The only crossings are
//!
//! ```text
//! ParkingPool::take  ──►  (held by a ride)  ──►  Fleet::depart  ──►  TransitStore
//! TransitStore  ──►  Fleet::arrive  ──►  ParkingPool::put
//! ```
//!
//! plus [`Fleet::refund`] for a vehicle taken by a ride that then could not
//! start.  Docking a vehicle that is already docked, or arriving one that is
//! not in transit, panics: either means the ledger is corrupt.

pub mod error;
pub mod fleet;
pub mod parking;
pub mod pool;
pub mod transit;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use error::{FleetError, FleetResult};
pub use fleet::Fleet;
pub use parking::ParkingLot;
pub use pool::ParkingPool;
pub use transit::{TransitStore, Trip};
pub use vehicle::VehicleRegistry;

/// Map keyed by a typed id.  FxHash with the `fx-hash` feature.
#[cfg(feature = "fx-hash")]
pub type IdMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Map keyed by a typed id.  FxHash with the `fx-hash` feature.
#[cfg(not(feature = "fx-hash"))]
pub type IdMap<K, V> = std::collections::HashMap<K, V>;
