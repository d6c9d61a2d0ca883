//! Synthetic grid road network for toy runs.
//!
//! A `size × size` lattice of two-way streets centred on a fixed point in
//! Munich's old town.  Good enough to exercise routing, neighbour lookup and
//! overflow without shipping an OSM extract.

use scoot_core::{GeoPoint, NodeId};
use scoot_spatial::{RoadNetwork, RoadNetworkBuilder};

/// Block edge length.
pub const BLOCK_M: f32 = 400.0;

/// Scooter speed used for edge travel times (~18 km/h).
const SPEED_MPS: f32 = 5.0;

const ORIGIN: GeoPoint = GeoPoint { lat: 48.137, lon: 11.575 };

/// Degrees of latitude per metre.
const LAT_PER_M: f64 = 1.0 / 111_320.0;

/// Build the lattice.  Returns the network and its node ids in row-major
/// order.
pub fn build_grid(size: usize) -> (RoadNetwork, Vec<NodeId>) {
    let size = size.max(2);
    let lon_per_m = LAT_PER_M / ORIGIN.lat.to_radians().cos();
    let travel_ms = (BLOCK_M / SPEED_MPS * 1_000.0) as u32;

    let mut b = RoadNetworkBuilder::with_capacity(size * size, 4 * size * (size - 1));
    let mut nodes = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let pos = GeoPoint::new(
                ORIGIN.lat + row as f64 * BLOCK_M as f64 * LAT_PER_M,
                ORIGIN.lon + col as f64 * BLOCK_M as f64 * lon_per_m,
            );
            nodes.push(b.add_node(pos));
        }
    }

    for row in 0..size {
        for col in 0..size {
            let here = nodes[row * size + col];
            if col + 1 < size {
                b.add_road(here, nodes[row * size + col + 1], BLOCK_M, travel_ms);
            }
            if row + 1 < size {
                b.add_road(here, nodes[(row + 1) * size + col], BLOCK_M, travel_ms);
            }
        }
    }

    (b.build(), nodes)
}
