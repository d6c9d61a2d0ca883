use thiserror::Error;

use scoot_core::{ParkingId, VehicleId};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan parse error: {0}")]
    Parse(String),

    #[error("{vehicle} is placed at unknown {parking}")]
    UnknownParking { vehicle: VehicleId, parking: ParkingId },

    /// A parking row had no graph node and the network is empty.
    #[error("{0} has no graph node and cannot be snapped to the road network")]
    Unsnappable(ParkingId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
