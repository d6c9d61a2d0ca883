use scoot_core::{NodeId, ParkingId, RequestId, RiderId, ScootError};
use scoot_fleet::FleetError;
use scoot_plan::PlanError;
use scoot_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] ScootError),

    #[error("{what} of {request} references unknown rider {rider}")]
    UnknownRider {
        request: RequestId,
        rider:   RiderId,
        what:    &'static str,
    },

    #[error("rider {0} not found")]
    RiderNotFound(RiderId),

    #[error("{what} references unknown parking {parking}")]
    UnknownParking {
        parking: ParkingId,
        what:    &'static str,
    },

    #[error("parking {parking} is attached to {node}, which is not in the road network")]
    NodeOutsideNetwork { parking: ParkingId, node: NodeId },

    #[error("rider {0} registered twice")]
    DuplicateRider(RiderId),

    #[error("request {0} appears twice")]
    DuplicateRequest(RequestId),

    #[error("ride requests are not in time order (request at index {index} starts earlier than its predecessor)")]
    UnsortedRequests { index: usize },

    #[error("rider {rider} has non-positive speed {speed_mps} m/s")]
    InvalidSpeed { rider: RiderId, speed_mps: f32 },

    #[error("actor table full: {live} rides in flight exhaust the actor id space")]
    ActorTableFull { live: usize },

    #[error("fleet error: {0}")]
    Fleet(#[from] FleetError),

    #[error("routing error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
}

pub type SimResult<T> = Result<T, SimError>;
