//! Vehicle registry: static attributes and odometers.

use scoot_core::VehicleId;
use scoot_plan::Vehicle;

use crate::{FleetError, FleetResult, IdMap};

/// Every vehicle known to the run, in registration order.
///
/// Where a vehicle *is* lives in [`ParkingPool`](crate::ParkingPool) or
/// [`TransitStore`](crate::TransitStore); this only holds what travels with
/// it.
#[derive(Default)]
pub struct VehicleRegistry {
    vehicles: Vec<Vehicle>,
    slot:     IdMap<VehicleId, usize>,
}

impl VehicleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, vehicle: Vehicle) -> FleetResult<()> {
        if self.slot.contains_key(&vehicle.id) {
            return Err(FleetError::DuplicateVehicle(vehicle.id));
        }
        self.slot.insert(vehicle.id, self.vehicles.len());
        self.vehicles.push(vehicle);
        Ok(())
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.slot.get(&id).map(|&i| &self.vehicles[i])
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.slot.contains_key(&id)
    }

    /// Add `metres` to the odometer and return the new total.
    pub fn add_distance(&mut self, id: VehicleId, metres: f64) -> FleetResult<f64> {
        let &i = self.slot.get(&id).ok_or(FleetError::UnknownVehicle(id))?;
        let v = &mut self.vehicles[i];
        v.distance_m += metres;
        Ok(v.distance_m)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.vehicles.iter()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
