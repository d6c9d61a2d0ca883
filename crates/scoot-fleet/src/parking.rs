//! A single docking location.

use std::collections::VecDeque;

use scoot_core::{GeoPoint, NodeId, ParkingId, VehicleId};
use scoot_plan::ParkingSpec;

/// One parking location and its current stock.
///
/// `stock` is FIFO: rides take from the front, arrivals join the back.
/// `capacity` is advisory.  A forced drop-off may push `stock.len()` past it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingLot {
    pub id:       ParkingId,
    pub pos:      GeoPoint,
    pub node:     NodeId,
    pub capacity: u32,
    /// Overflow neighbours in plan order.
    pub nearby:   Vec<ParkingId>,
    pub(crate) stock: VecDeque<VehicleId>,
}

impl ParkingLot {
    /// An empty lot with the spec's location, capacity and neighbours.  The
    /// spec's vehicles are docked by [`crate::Fleet::from_specs`].
    pub fn from_spec(spec: &ParkingSpec) -> Self {
        Self {
            id:       spec.id,
            pos:      spec.pos,
            node:     spec.node,
            capacity: spec.capacity,
            nearby:   spec.nearby.clone(),
            stock:    VecDeque::with_capacity(spec.capacity as usize),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stock.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    /// `true` once the stock has reached the advisory capacity.
    #[inline]
    pub fn is_at_capacity(&self) -> bool {
        self.stock.len() >= self.capacity as usize
    }

    /// Vehicles front (next to be taken) to back.
    pub fn stock(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.stock.iter().copied()
    }
}
