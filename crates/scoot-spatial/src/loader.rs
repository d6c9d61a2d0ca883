//! CSV road-network loader.
//!
//! # CSV format
//!
//! Two files.  Node ids must be dense and listed in order `0..n`, because
//! they become `NodeId`s directly.
//!
//! ```csv
//! # nodes.csv
//! node_id,lat,lon
//! 0,55.7512,37.6184
//! 1,55.7520,37.6201
//! ```
//!
//! ```csv
//! # edges.csv
//! from,to,length_m,travel_ms,oneway
//! 0,1,142.5,10260,false
//! ```
//!
//! `travel_ms` may be left empty, in which case it is derived from
//! `length_m` at a nominal 5 m/s.  `oneway` defaults to `false` (edges in
//! both directions).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use scoot_core::{GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{SpatialError, SpatialResult};

/// Speed used to fill in a missing `travel_ms`.
const FALLBACK_SPEED_MPS: f32 = 5.0;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: u32,
    lat:     f64,
    lon:     f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:      u32,
    to:        u32,
    length_m:  f32,
    #[serde(default)]
    travel_ms: Option<u32>,
    #[serde(default)]
    oneway:    Option<bool>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RoadNetwork`] from `nodes.csv` and `edges.csv` inside `dir`.
pub fn load_network_csv(dir: &Path) -> SpatialResult<RoadNetwork> {
    let nodes = std::fs::File::open(dir.join("nodes.csv"))?;
    let edges = std::fs::File::open(dir.join("edges.csv"))?;
    load_network_readers(nodes, edges)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_readers<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<RoadNetwork> {
    let mut b = RoadNetworkBuilder::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    for result in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let expected = b.node_count() as u32;
        if row.node_id != expected {
            return Err(SpatialError::Parse(format!(
                "node ids must be dense and ordered: expected {expected}, found {}",
                row.node_id
            )));
        }
        b.add_node(GeoPoint::new(row.lat, row.lon));
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let node_count = b.node_count() as u32;
    for result in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        for id in [row.from, row.to] {
            if id >= node_count {
                return Err(SpatialError::NodeNotFound(NodeId(id)));
            }
        }
        if !(row.length_m >= 0.0) {
            return Err(SpatialError::Parse(format!(
                "edge {}->{} has invalid length {}",
                row.from, row.to, row.length_m
            )));
        }

        let travel_ms = row
            .travel_ms
            .unwrap_or_else(|| (row.length_m / FALLBACK_SPEED_MPS * 1000.0) as u32);
        let (from, to) = (NodeId(row.from), NodeId(row.to));

        if row.oneway.unwrap_or(false) {
            b.add_directed_edge(from, to, row.length_m, travel_ms);
        } else {
            b.add_road(from, to, row.length_m, travel_ms);
        }
    }

    Ok(b.build())
}
