//! `Fleet` — the pool, the registry and the transit ledger under one owner.

use scoot_core::{ParkingId, VehicleId};
use scoot_plan::ParkingSpec;

use crate::{FleetResult, ParkingLot, ParkingPool, TransitStore, Trip, VehicleRegistry};

/// All vehicle-owning state of one run.
#[derive(Default)]
pub struct Fleet {
    pub pool:     ParkingPool,
    pub vehicles: VehicleRegistry,
    pub transit:  TransitStore,
}

impl Fleet {
    /// Build the initial fleet: one lot per spec, each spec's vehicles
    /// registered and docked in order (first listed = first taken).
    pub fn from_specs(specs: &[ParkingSpec]) -> FleetResult<Self> {
        let mut fleet = Fleet::default();
        for spec in specs {
            fleet.pool.insert_lot(ParkingLot::from_spec(spec))?;
        }
        for spec in specs {
            for v in &spec.vehicles {
                fleet.vehicles.register(v.clone())?;
                fleet.pool.put(spec.id, v.id)?;
            }
        }
        Ok(fleet)
    }

    /// Hand a vehicle that a ride has taken to the transit ledger.
    ///
    /// # Panics
    /// Panics if the vehicle is still docked or already in transit.
    pub fn depart(&mut self, trip: Trip) {
        if let Some(at) = self.pool.locate(trip.vehicle) {
            panic!("{} departs while still docked at {at}", trip.vehicle);
        }
        self.transit.begin(trip);
    }

    /// Complete `vehicle`'s trip: add its distance to the odometer and dock
    /// it at the trip's destination.  Returns the finished trip.
    ///
    /// # Panics
    /// Panics if the vehicle is not in transit.
    pub fn arrive(&mut self, vehicle: VehicleId) -> FleetResult<Trip> {
        let Some(trip) = self.transit.end(vehicle) else {
            panic!("{vehicle} arrived without being in transit");
        };
        self.vehicles.add_distance(vehicle, trip.distance_m)?;
        self.pool.put(trip.to_parking, vehicle)?;
        Ok(trip)
    }

    /// Put a taken vehicle back at the front of the lot it came from.
    pub fn refund(&mut self, parking: ParkingId, vehicle: VehicleId) -> FleetResult<()> {
        self.pool.put_front(parking, vehicle)
    }

    /// Docked + in transit == registered.  Vehicles held by a ride between
    /// `take` and `depart` are not counted, so this only holds between ride
    /// steps.
    pub fn is_conserved(&self) -> bool {
        self.pool.docked_count() + self.transit.len() == self.vehicles.len()
    }
}
