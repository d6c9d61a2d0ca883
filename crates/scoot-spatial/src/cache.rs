//! LRU memoization over any [`Router`].
//!
//! Ride demand concentrates on a few hundred parking nodes, so the same
//! `(origin, destination)` pairs recur constantly over a day.  Only successful
//! routes are cached; failures are recomputed on every query.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use scoot_core::NodeId;

use crate::network::RoadNetwork;
use crate::router::{Route, Router, Weight};
use crate::SpatialResult;

/// Default number of cached routes.
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 20_000;

type RouteKey = (NodeId, NodeId, Weight);

/// Caching wrapper around an inner [`Router`].
///
/// The cache key does not identify the network: use one `CachedRouter` per
/// `RoadNetwork`.
pub struct CachedRouter<R> {
    inner: R,
    cache: Mutex<LruCache<RouteKey, Route>>,
}

impl<R: Router> CachedRouter<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_ROUTE_CACHE_CAPACITY)
    }

    /// A zero capacity is bumped to one entry.
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { inner, cache: Mutex::new(LruCache::new(cap)) }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of routes currently cached.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Router> Router for CachedRouter<R> {
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weight: Weight,
    ) -> SpatialResult<Route> {
        let key = (from, to, weight);

        // Fast path: cache hit.  A poisoned lock just means no caching.
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                return Ok(hit.clone());
            }
        }

        let route = self.inner.route(network, from, to, weight)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, route.clone());
        }
        Ok(route)
    }
}
