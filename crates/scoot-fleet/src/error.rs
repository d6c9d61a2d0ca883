use scoot_core::{ParkingId, VehicleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("unknown parking {0}")]
    UnknownParking(ParkingId),

    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),

    #[error("parking {0} registered twice")]
    DuplicateParking(ParkingId),

    #[error("vehicle {0} registered twice")]
    DuplicateVehicle(VehicleId),
}

pub type FleetResult<T> = Result<T, FleetError>;
