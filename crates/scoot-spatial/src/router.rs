//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `scoot-sim` asks for distances through the [`Router`] trait, so a caller
//! can swap in contraction hierarchies, a precomputed distance matrix or a
//! test double without touching the engine.  The default [`DijkstraRouter`]
//! is plenty for a city-sized graph, especially behind
//! [`CachedRouter`](crate::CachedRouter).
//!
//! # Cost units
//!
//! Costs are `f64`: metres for [`Weight::Length`], seconds for
//! [`Weight::TravelTime`].  A returned [`Route`] always carries both totals,
//! whichever one it was optimized for.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use scoot_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Weight ────────────────────────────────────────────────────────────────────

/// Which edge attribute a shortest-path query minimizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weight {
    /// Physical edge length in metres.  Ride distances use this.
    #[default]
    Length,
    /// Nominal traversal time.
    TravelTime,
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Edges to traverse in order, from source to destination.
    pub edges: Vec<EdgeId>,
    /// Sum of `edge_length_m` along `edges`.
    pub length_m: f64,
    /// Sum of `edge_travel_ms` along `edges`, in seconds.
    pub travel_secs: f64,
}

impl Route {
    /// The zero-length route from a node to itself.
    pub fn trivial() -> Self {
        Self { edges: Vec::new(), length_m: 0.0, travel_secs: 0.0 }
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: the demo runs independent
/// replicates on Rayon workers that share one router.
pub trait Router: Send + Sync {
    /// Shortest route from `from` to `to` minimizing `weight`.
    ///
    /// `from == to` yields [`Route::trivial`].  Disconnected nodes yield
    /// [`SpatialError::NoRoute`]; ids outside the network yield
    /// [`SpatialError::NodeNotFound`].
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weight: Weight,
    ) -> SpatialResult<Route>;

    /// Length in metres of the length-weighted shortest path.
    fn path_length_m(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<f64> {
        self.route(network, from, to, Weight::Length).map(|r| r.length_m)
    }
}

impl<R: Router + ?Sized> Router for std::sync::Arc<R> {
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weight: Weight,
    ) -> SpatialResult<Route> {
        (**self).route(network, from, to, weight)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph.
#[derive(Debug, Default, Clone, Copy)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weight: Weight,
    ) -> SpatialResult<Route> {
        dijkstra(network, from, to, weight)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[inline]
fn edge_cost(network: &RoadNetwork, edge: EdgeId, weight: Weight) -> f64 {
    match weight {
        Weight::Length     => network.edge_length_m[edge.index()] as f64,
        Weight::TravelTime => network.edge_travel_ms[edge.index()] as f64 / 1000.0,
    }
}

fn dijkstra(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    weight: Weight,
) -> SpatialResult<Route> {
    for node in [from, to] {
        if !network.contains(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }
    if from == to {
        return Ok(Route::trivial());
    }

    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Secondary key NodeId keeps tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to));
        }

        // Stale heap entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + edge_cost(network, edge, weight);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(network: &RoadNetwork, prev_edge: &[EdgeId], from: NodeId, to: NodeId) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert!(e.is_valid(), "settled node without predecessor");
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    // Totals are summed in path order so both weights are reported exactly.
    let length_m = edges
        .iter()
        .map(|e| network.edge_length_m[e.index()] as f64)
        .sum();
    let travel_secs = edges
        .iter()
        .map(|e| network.edge_travel_ms[e.index()] as f64 / 1000.0)
        .sum();

    Route { edges, length_m, travel_secs }
}
