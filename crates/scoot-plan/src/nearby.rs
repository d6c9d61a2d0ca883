//! Overflow-neighbour assignment.
//!
//! Each parking location keeps a short list of nearby locations.  The ride
//! protocol borrows a vehicle from them when the origin is empty and drops
//! off there when the destination is full.  Plans usually ship these lists;
//! when a row leaves its list empty it is derived from the road graph:
//!
//! 1. other parking attached to the **same node**, in plan order;
//! 2. then parking attached to **adjacent nodes** (either edge direction),
//!    walking the adjacent nodes in ascending id order;
//!
//! stopping once `k` neighbours are collected.

use std::collections::HashMap;

use scoot_core::{NodeId, ParkingId};
use scoot_spatial::RoadNetwork;

use crate::model::ParkingSpec;

/// How many neighbours a derived list holds.
pub const DEFAULT_NEARBY_COUNT: usize = 3;

/// Fill every empty `nearby` list in `parking`.  Returns how many lists were
/// filled.  Non-empty lists are left untouched.
pub fn assign_nearby(parking: &mut [ParkingSpec], network: &RoadNetwork, k: usize) -> usize {
    let mut by_node: HashMap<NodeId, Vec<ParkingId>> = HashMap::new();
    for p in parking.iter() {
        by_node.entry(p.node).or_default().push(p.id);
    }

    let mut filled = 0;
    for spec in parking.iter_mut().filter(|p| p.nearby.is_empty()) {
        let mut picked: Vec<ParkingId> = Vec::with_capacity(k);

        collect_at(&by_node, spec.node, spec.id, k, &mut picked);
        if picked.len() < k && network.contains(spec.node) {
            for adj in network.adjacent_nodes(spec.node) {
                if picked.len() == k {
                    break;
                }
                collect_at(&by_node, adj, spec.id, k, &mut picked);
            }
        }

        if !picked.is_empty() {
            filled += 1;
        }
        log::debug!("{} nearby parking: {:?}", spec.id, picked);
        spec.nearby = picked;
    }
    filled
}

/// Append parking attached to `node` (other than `own`) until `picked` holds `k`.
fn collect_at(
    by_node: &HashMap<NodeId, Vec<ParkingId>>,
    node: NodeId,
    own: ParkingId,
    k: usize,
    picked: &mut Vec<ParkingId>,
) {
    for &id in by_node.get(&node).into_iter().flatten() {
        if picked.len() == k {
            return;
        }
        if id != own && !picked.contains(&id) {
            picked.push(id);
        }
    }
}
