//! Vehicles currently on a ride.

use scoot_core::{NodeId, ParkingId, RideId, RiderId, Tick, VehicleId};

use crate::IdMap;

/// One vehicle's journey between two lots.
///
/// The simulation uses a **teleport-at-arrival** model: the vehicle belongs
/// to neither lot until `arrival_tick`, then appears in `to_parking`'s stock.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub ride:           RideId,
    pub rider:          RiderId,
    pub vehicle:        VehicleId,
    pub from_parking:   ParkingId,
    pub to_parking:     ParkingId,
    pub from_node:      NodeId,
    pub to_node:        NodeId,
    pub departure_tick: Tick,
    pub arrival_tick:   Tick,
    pub distance_m:     f64,
}

impl Trip {
    /// Fraction of the journey completed at `now`, in `[0.0, 1.0]`.
    ///
    /// Returns `1.0` for zero-length trips or when `now >= arrival_tick`.
    pub fn progress(&self, now: Tick) -> f32 {
        if self.arrival_tick <= self.departure_tick {
            return 1.0;
        }
        let elapsed = now.0.saturating_sub(self.departure_tick.0) as f32;
        let total   = (self.arrival_tick.0 - self.departure_tick.0) as f32;
        (elapsed / total).min(1.0)
    }
}

/// Sparse ledger: `VehicleId → Trip` for vehicles in transit only.
#[derive(Default)]
pub struct TransitStore {
    trips: IdMap<VehicleId, Trip>,
}

impl TransitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a departure.
    ///
    /// # Panics
    /// Panics if the vehicle is already in transit.
    pub fn begin(&mut self, trip: Trip) {
        let vehicle = trip.vehicle;
        if self.trips.insert(vehicle, trip).is_some() {
            panic!("{vehicle} departed while already in transit");
        }
    }

    /// Remove and return the vehicle's trip, or `None` if it is not in
    /// transit.
    pub fn end(&mut self, vehicle: VehicleId) -> Option<Trip> {
        self.trips.remove(&vehicle)
    }

    pub fn get(&self, vehicle: VehicleId) -> Option<&Trip> {
        self.trips.get(&vehicle)
    }

    #[inline]
    pub fn in_transit(&self, vehicle: VehicleId) -> bool {
        self.trips.contains_key(&vehicle)
    }

    /// Trips in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Trip> + '_ {
        self.trips.values()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}
