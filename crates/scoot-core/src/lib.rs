//! `scoot-core` — foundational types for the `scootsim` scooter-sharing
//! simulator.
//!
//! Every other `scoot-*` crate depends on this one.  It has no `scoot-*`
//! dependencies and only two external ones (`rand`, `thiserror`), plus
//! optional `serde`.
//!
//! # What lives here
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`ids`]    | `RiderId`, `VehicleId`, `ParkingId`, `RequestId`, `RideId`,     |
//! |            | `ActorId`, `NodeId`, `EdgeId`                                   |
//! | [`geo`]    | `GeoPoint`, haversine distance                                  |
//! | [`time`]   | `Tick`, `SimClock`, `SimConfig`                                 |
//! | [`rng`]    | `SimRng` (seeded, for plan synthesis)                           |
//! | [`error`]  | `ScootError`, `ScootResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ScootError, ScootResult};
pub use geo::GeoPoint;
pub use ids::{ActorId, EdgeId, NodeId, ParkingId, RequestId, RideId, RiderId, VehicleId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick, DEFAULT_PROBE_INTERVAL_SECS};
