//! Fluent builder for constructing a [`Sim`].

use std::collections::{HashSet, VecDeque};

use scoot_core::{RiderId, SimConfig};
use scoot_fleet::{Fleet, IdMap};
use scoot_plan::{Rider, SimulationPlan};
use scoot_spatial::{RoadNetwork, Router};

use crate::sim::PendingRequest;
use crate::state::SimulationState;
use crate::wake_queue::WakeQueue;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: window, probe interval, ride limit
/// - [`SimulationPlan`]: riders, parking with initial stock, ride requests
/// - `R: Router`: the routing algorithm (e.g. [`scoot_spatial::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                 |
/// |-----------------|-------------------------|
/// | `.network(n)`   | `RoadNetwork::empty()`  |
///
/// With an empty network every parking node is rejected unless the plan has
/// no parking at all, so real runs always supply one.
///
/// # Example
///
/// ```rust,ignore
/// let plan = load_plan_dir("plan/", &network, start, end)?;
/// let mut sim = SimBuilder::from_plan(plan, CachedRouter::new(DijkstraRouter))
///     .network(network)
///     .build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: Router> {
    config:  SimConfig,
    plan:    SimulationPlan,
    network: Option<RoadNetwork>,
    router:  R,
}

impl<R: Router> SimBuilder<R> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, plan: SimulationPlan, router: R) -> Self {
        Self { config, plan, network: None, router }
    }

    /// Builder whose config covers the plan's own window with defaults for
    /// everything else.
    pub fn from_plan(plan: SimulationPlan, router: R) -> Self {
        let config = SimConfig::for_window(plan.start_unix_secs, plan.end_unix_secs);
        Self::new(config, plan, router)
    }

    /// Supply the road network used for ride distances.
    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(network);
        self
    }

    /// Validate the plan against itself and the network, load the fleet and
    /// return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;
        let network = self.network.unwrap_or_else(RoadNetwork::empty);
        let plan = self.plan;

        // ── Riders ────────────────────────────────────────────────────────
        let mut riders: IdMap<RiderId, Rider> = IdMap::default();
        for rider in plan.riders {
            if rider.speed_mps.is_nan() || rider.speed_mps <= 0.0 {
                return Err(SimError::InvalidSpeed { rider: rider.id, speed_mps: rider.speed_mps });
            }
            if riders.contains_key(&rider.id) {
                return Err(SimError::DuplicateRider(rider.id));
            }
            riders.insert(rider.id, rider);
        }

        // ── Parking and vehicles ──────────────────────────────────────────
        let fleet = Fleet::from_specs(&plan.parking)?;
        for spec in &plan.parking {
            if !network.contains(spec.node) {
                return Err(SimError::NodeOutsideNetwork { parking: spec.id, node: spec.node });
            }
            if let Some(&missing) = spec.nearby.iter().find(|&&p| !fleet.pool.contains(p)) {
                return Err(SimError::UnknownParking { parking: missing, what: "nearby list" });
            }
        }

        // ── Requests ──────────────────────────────────────────────────────
        let mut seen = HashSet::with_capacity(plan.rides.len());
        let mut pending = VecDeque::with_capacity(plan.rides.len());
        let mut prev_unix = i64::MIN;
        for (index, request) in plan.rides.into_iter().enumerate() {
            if !riders.contains_key(&request.rider) {
                return Err(SimError::UnknownRider {
                    request: request.id,
                    rider:   request.rider,
                    what:    "rider",
                });
            }
            if !fleet.pool.contains(request.origin) {
                return Err(SimError::UnknownParking { parking: request.origin, what: "ride origin" });
            }
            if !fleet.pool.contains(request.destination) {
                return Err(SimError::UnknownParking {
                    parking: request.destination,
                    what:    "ride destination",
                });
            }
            if !seen.insert(request.id) {
                return Err(SimError::DuplicateRequest(request.id));
            }
            if request.desired_unix_secs < prev_unix {
                return Err(SimError::UnsortedRequests { index });
            }
            prev_unix = request.desired_unix_secs;

            let due = self.config.tick_at(request.desired_unix_secs);
            pending.push_back(PendingRequest { request, due });
        }

        log::debug!(
            "built sim: {} riders, {} parking, {} vehicles, {} requests, network {} nodes",
            riders.len(),
            fleet.pool.len(),
            fleet.vehicles.len(),
            pending.len(),
            network.node_count(),
        );

        Ok(Sim {
            clock:          self.config.make_clock(),
            state:          SimulationState::new(self.config.start_unix_secs, fleet, riders),
            config:         self.config,
            network,
            router:         self.router,
            wake_queue:     WakeQueue::new(),
            pending,
            actors:         Vec::new(),
            free_slots:     Vec::new(),
            live:           0,
            last_processed: None,
        })
    }
}
