//! `WakeQueue` — sparse per-tick actor activation queue.
//!
//! A suspended ride actor registers the tick at which it needs attention
//! next.  The scheduler jumps straight to the earliest registered tick and
//! drains only the actors filed there, so idle seconds cost nothing.
//!
//! # Ordering
//!
//! Actors filed for the same tick come back in the order they were pushed,
//! which is the order they suspended.
//!
//! # Performance note
//!
//! `BTreeMap` gives O(log W) insert and pop where W = number of distinct
//! wake ticks currently enqueued.  With a 10 s probe interval and ride
//! durations of a few minutes, W stays in the low thousands.

use std::collections::BTreeMap;

use scoot_core::{ActorId, Tick};

/// A priority queue mapping simulation ticks to actors that wake at that tick.
#[derive(Default)]
pub struct WakeQueue {
    inner: BTreeMap<Tick, Vec<ActorId>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `actor` to wake at `tick`.
    pub fn push(&mut self, tick: Tick, actor: ActorId) {
        self.inner.entry(tick).or_default().push(actor);
        self.total += 1;
    }

    /// Remove and return all actors scheduled for exactly `tick`, in push
    /// order.
    ///
    /// Returns `None` if no actors are queued for that tick.
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<ActorId>> {
        let actors = self.inner.remove(&tick)?;
        self.total -= actors.len();
        Some(actors)
    }

    /// The earliest tick with at least one queued actor, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Total number of (tick, actor) entries across all future ticks.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future ticks that have at least one queued actor.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
