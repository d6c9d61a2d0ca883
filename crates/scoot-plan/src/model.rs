//! Plan data model.
//!
//! All types here are plain data.  The engine copies what it needs into its
//! own state at build time; a `SimulationPlan` is never mutated by a run.

use scoot_core::{GeoPoint, NodeId, ParkingId, RequestId, RiderId, VehicleId};

// ── Rider ─────────────────────────────────────────────────────────────────────

/// A registered person who may request rides.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rider {
    pub id:   RiderId,
    /// Carried through for reporting; the engine never reads it.
    pub name: String,
    pub age:  u16,
    /// Average riding speed in metres per second.  Must be positive.
    pub speed_mps: f32,
    /// Remaining promotional credits; one is consumed per realized ride.
    pub promo_credits: u32,
    /// How long the rider keeps searching for a vehicle before giving up.
    pub wait_limit_secs: u64,
}

impl Rider {
    /// Convert a km/h speed, the unit riders are surveyed in.
    #[inline]
    pub fn kmh_to_mps(speed_kmh: f32) -> f32 {
        speed_kmh / 3.6
    }
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id:          VehicleId,
    pub hardware_id: String,
    /// Odometer in metres at plan start.
    pub distance_m:  f64,
}

impl Vehicle {
    pub fn new(id: VehicleId, hardware_id: impl Into<String>) -> Self {
        Self { id, hardware_id: hardware_id.into(), distance_m: 0.0 }
    }
}

// ── ParkingSpec ───────────────────────────────────────────────────────────────

/// Initial description of one docking location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParkingSpec {
    pub id:       ParkingId,
    pub pos:      GeoPoint,
    /// Road-graph node the location is attached to.
    pub node:     NodeId,
    /// Advisory maximum stock; drop-off overflow tries to respect it.
    pub capacity: u32,
    /// Overflow neighbours, best first (at most a handful).
    pub nearby:   Vec<ParkingId>,
    /// Initial stock, front of the queue first.
    pub vehicles: Vec<Vehicle>,
}

// ── RideRequest ───────────────────────────────────────────────────────────────

/// One scheduled ride.  Immutable; consumed exactly once by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RideRequest {
    pub id:          RequestId,
    pub rider:       RiderId,
    pub origin:      ParkingId,
    pub destination: ParkingId,
    /// Desired start as a Unix timestamp.
    pub desired_unix_secs: i64,
}

// ── SimulationPlan ────────────────────────────────────────────────────────────

/// Everything a run starts from.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationPlan {
    /// Unix timestamp mapped to tick 0.
    pub start_unix_secs: i64,
    /// Exclusive end of the simulated window.
    pub end_unix_secs:   i64,
    pub riders:  Vec<Rider>,
    pub parking: Vec<ParkingSpec>,
    /// Ride requests in non-decreasing `desired_unix_secs` order.
    pub rides:   Vec<RideRequest>,
}

impl SimulationPlan {
    pub fn new(start_unix_secs: i64, end_unix_secs: i64) -> Self {
        Self { start_unix_secs, end_unix_secs, ..Self::default() }
    }

    /// Length of the window in seconds (0 for an inverted window).
    pub fn window_secs(&self) -> u64 {
        self.end_unix_secs.saturating_sub(self.start_unix_secs).max(0) as u64
    }

    /// Total number of vehicles across all parking.
    pub fn vehicle_count(&self) -> usize {
        self.parking.iter().map(|p| p.vehicles.len()).sum()
    }

    /// `true` if `rides` is in non-decreasing desired-start order.
    pub fn rides_sorted(&self) -> bool {
        self.rides
            .windows(2)
            .all(|w| w[0].desired_unix_secs <= w[1].desired_unix_secs)
    }

    /// Stable sort of `rides` by desired start; ties keep their order.
    pub fn sort_rides(&mut self) {
        self.rides.sort_by_key(|r| r.desired_unix_secs);
    }
}
