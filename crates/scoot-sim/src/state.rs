//! `SimulationState` — the single mutable aggregate of a run.

use scoot_core::{RideId, RiderId, Tick};
use scoot_fleet::{Fleet, IdMap};
use scoot_plan::Rider;

use crate::record::{CancelledRide, RealizedRide, UnroutableRide};
use crate::{SimError, SimResult};

/// Parking, vehicles, riders and the outcome lists.
///
/// Written only by the scheduler and the ride protocol while a run is in
/// progress; read-only to everyone else.
pub struct SimulationState {
    start_unix_secs: i64,
    fleet:           Fleet,
    riders:          IdMap<RiderId, Rider>,
    realized:        Vec<RealizedRide>,
    cancelled:       Vec<CancelledRide>,
    unroutable:      Vec<UnroutableRide>,
}

impl SimulationState {
    pub fn new(start_unix_secs: i64, fleet: Fleet, riders: IdMap<RiderId, Rider>) -> Self {
        Self {
            start_unix_secs,
            fleet,
            riders,
            realized:   Vec::new(),
            cancelled:  Vec::new(),
            unroutable: Vec::new(),
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn start_unix_secs(&self) -> i64 {
        self.start_unix_secs
    }

    /// Unix timestamp of `tick`.
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn rider(&self, id: RiderId) -> Option<&Rider> {
        self.riders.get(&id)
    }

    pub fn rider_count(&self) -> usize {
        self.riders.len()
    }

    /// Realized rides in booking order.
    pub fn realized(&self) -> &[RealizedRide] {
        &self.realized
    }

    /// Cancelled rides in cancellation order.
    pub fn cancelled(&self) -> &[CancelledRide] {
        &self.cancelled
    }

    pub fn unroutable(&self) -> &[UnroutableRide] {
        &self.unroutable
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Use one of the rider's promotional credits if any remain.  Returns
    /// whether one was used; credits never go below zero.
    pub fn consume_promo(&mut self, rider: RiderId) -> SimResult<bool> {
        let r = self.riders.get_mut(&rider).ok_or(SimError::RiderNotFound(rider))?;
        if r.promo_credits == 0 {
            return Ok(false);
        }
        r.promo_credits -= 1;
        Ok(true)
    }

    pub(crate) fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    /// Append a realized ride, assigning the next id (1, 2, 3…).
    pub(crate) fn record_realized(&mut self, mut ride: RealizedRide) -> RideId {
        ride.id = RideId::nth(self.realized.len());
        let id = ride.id;
        self.realized.push(ride);
        id
    }

    /// Append a cancelled ride, assigning the next cancellation id.
    pub(crate) fn record_cancelled(&mut self, mut ride: CancelledRide) -> RideId {
        ride.id = RideId::nth(self.cancelled.len());
        let id = ride.id;
        self.cancelled.push(ride);
        id
    }

    pub(crate) fn record_unroutable(&mut self, ride: UnroutableRide) {
        self.unroutable.push(ride);
    }
}
