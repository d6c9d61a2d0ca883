//! Spatial-subsystem error type.

use thiserror::Error;

use scoot_core::NodeId;

/// Errors produced by `scoot-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The two nodes are disconnected (the engine's PathNotFound).
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
