//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `ScootError` as one
//! variant via `#[from]`, so configuration and lookup failures raised here
//! propagate with `?` unchanged.

use thiserror::Error;

use crate::{NodeId, ParkingId, RiderId, VehicleId};

/// The top-level error type for `scoot-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum ScootError {
    #[error("rider {0} not found")]
    RiderNotFound(RiderId),

    #[error("parking {0} not found")]
    ParkingNotFound(ParkingId),

    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `scoot-*` crates.
pub type ScootResult<T> = Result<T, ScootError>;
