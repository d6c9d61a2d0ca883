//! Outcome records and the run summary.
//!
//! Records are created exactly once, when their outcome is determined, and
//! never mutated afterwards.  Times are ticks; `SimulationState` knows the
//! Unix offset.

use scoot_core::{ParkingId, RequestId, RideId, RiderId, Tick, VehicleId};

/// A ride that got a vehicle and started.
///
/// Booked when the ride starts, so a ride still in transit when the run ends
/// is already here (with an `end` beyond the window).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealizedRide {
    pub id:            RideId,
    pub request:       RequestId,
    pub rider:         RiderId,
    pub vehicle:       VehicleId,
    /// Where the vehicle was actually taken (may be a neighbour).
    pub origin:        ParkingId,
    /// Where the vehicle is actually dropped (may be an overflow neighbour).
    pub destination:   ParkingId,
    pub desired_start: Tick,
    pub start:         Tick,
    pub end:           Tick,
    pub distance_m:    f64,
    pub duration_secs: u64,
    pub promo_used:    bool,
    /// Time spent waiting for a vehicle before the ride started.
    pub search_secs:   u64,
    /// Redirects: 1 for a neighbour pickup, 1 for an overflow drop-off.
    pub attempts:      u32,
}

/// A request whose rider gave up waiting for a vehicle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CancelledRide {
    pub id:            RideId,
    pub request:       RequestId,
    pub rider:         RiderId,
    /// The requested origin.
    pub origin:        ParkingId,
    pub desired_start: Tick,
    pub search_secs:   u64,
    pub attempts:      u32,
}

/// Why a ride that already held a vehicle could not start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnroutableReason {
    /// No road path between the two parking nodes.
    NoRoute,
    /// The ride would end past the last representable tick (a near-zero
    /// rider speed or an absurd distance).
    DurationOverflow,
}

impl UnroutableReason {
    pub fn as_str(self) -> &'static str {
        match self {
            UnroutableReason::NoRoute          => "no_route",
            UnroutableReason::DurationOverflow => "duration_overflow",
        }
    }
}

/// A ride that found a vehicle but could not start it.  The vehicle went
/// back to the front of `origin`'s stock.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnroutableRide {
    pub request:     RequestId,
    pub rider:       RiderId,
    pub vehicle:     VehicleId,
    pub origin:      ParkingId,
    pub destination: ParkingId,
    pub tick:        Tick,
    pub reason:      UnroutableReason,
}

/// Totals reported when a run ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub realized:         usize,
    pub cancelled:        usize,
    pub unroutable:       usize,
    /// Requests never dispatched: still queued at the window end or after
    /// the ride limit closed dispatch.
    pub dropped_requests: usize,
    /// Last tick on which anything happened.
    pub final_tick:       Tick,
    pub docked:           usize,
    pub in_transit:       usize,
}
