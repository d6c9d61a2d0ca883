//! The road graph scooters ride on, and the builder that assembles it.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  For a
//! `NodeId n` its edges are the contiguous `EdgeId` range
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! into the parallel edge arrays (`edge_from`, `edge_to`, `edge_length_m`,
//! `edge_travel_ms`), which are sorted by source node.  Scanning a node's
//! neighbours in Dijkstra's inner loop is a linear memory walk.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  The
//! plan loader uses it to snap parking locations that arrive without a graph
//! node onto the road network.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use scoot_core::{EdgeId, GeoPoint, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space; adequate for nearest-node
    /// snapping inside one city.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Fields are `pub` for indexed access on hot paths.  Build with
/// [`RoadNetworkBuilder`] or [`crate::load_network_csv`].
#[derive(Clone)]
pub struct RoadNetwork {
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer, length `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge (needed to walk a route backwards).
    pub edge_from: Vec<NodeId>,

    /// Head node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Physical length in metres.  This is the weight the ride engine uses.
    pub edge_length_m: Vec<f32>,

    /// Nominal traversal time in milliseconds.
    pub edge_travel_ms: Vec<u32>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// A network with no nodes.  Every route query against it fails with
    /// `NodeNotFound`.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` indexes a node of this network.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Edges leaving `node`, as one contiguous CSR slice.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Nodes adjacent to `node` in either direction, ascending and without
    /// duplicates.
    ///
    /// Incoming edges are not indexed, so this scans all edges: O(E).  It is
    /// meant for one-off preprocessing (nearby-parking assignment), not for
    /// the simulation loop.
    pub fn adjacent_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .out_edges(node)
            .map(|e| self.edge_to[e.index()])
            .chain(
                self.edge_to
                    .iter()
                    .enumerate()
                    .filter(|&(_, &to)| to == node)
                    .map(|(i, _)| self.edge_from[i]),
            )
            .filter(|&n| n != node)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// The nearest road node to `pos`, or `None` for an empty network.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&pos.as_f32_pair())
            .map(|e| e.id)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collects nodes and streets in any order; [`build`](Self::build) sorts
/// them into CSR form.
///
/// # Example
///
/// ```
/// use scoot_core::GeoPoint;
/// use scoot_spatial::RoadNetworkBuilder;
///
/// let mut builder = RoadNetworkBuilder::new();
/// let marienplatz = builder.add_node(GeoPoint::new(48.1374, 11.5755));
/// let odeonsplatz = builder.add_node(GeoPoint::new(48.1427, 11.5776));
/// builder.add_road(marienplatz, odeonsplatz, 650.0, 130_000);
/// let net = builder.build();
/// assert_eq!((net.node_count(), net.edge_count()), (2, 2));
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length_m:  f32,
    travel_ms: u32,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// One-way street from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f32, travel_ms: u32) {
        self.raw_edges.push(RawEdge { from, to, length_m, travel_ms });
    }

    /// Add edges in both directions for an ordinary two-way street.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f32, travel_ms: u32) {
        self.add_directed_edge(a, b, length_m, travel_ms);
        self.add_directed_edge(b, a, length_m, travel_ms);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Freeze into a [`RoadNetwork`].
    ///
    /// O(E log E) for the edge sort plus O(N log N) for the R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:      Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:        Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m:  Vec<f32>    = raw.iter().map(|e| e.length_m).collect();
        let edge_travel_ms: Vec<u32>    = raw.iter().map(|e| e.travel_ms).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: pos.as_f32_pair(),
                id: NodeId(i as u32),
            })
            .collect();

        RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_travel_ms,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}
