//! The `Sim` struct and its event loop.

use std::collections::VecDeque;

use scoot_core::{ActorId, SimClock, SimConfig, Tick};
use scoot_plan::RideRequest;
use scoot_spatial::{RoadNetwork, Router};

use crate::actor::{Outcome, RideActor, Step, StepCtx};
use crate::observer::{SimObserver, TickActivity};
use crate::record::RunSummary;
use crate::state::SimulationState;
use crate::wake_queue::WakeQueue;
use crate::{SimError, SimResult};

/// A request waiting for its due tick.
#[derive(Clone, Debug)]
pub(crate) struct PendingRequest {
    pub request: RideRequest,
    pub due:     Tick,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The ride simulation runner.
///
/// The loop visits only ticks on which something happens:
///
/// 1. **Jump**: advance the clock to the earlier of the next wake-up and the
///    next due request.  Stop at `config.end_tick()`.
/// 2. **Wake**: resume every actor filed for this tick, in suspension order.
/// 3. **Dispatch**: unless the ride limit is reached, turn each due request
///    into a new actor, in request order, stepping each one to its first
///    suspension before the next is created.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router> {
    /// Run configuration (window, probe interval, ride limit).
    pub config: SimConfig,

    /// Simulation clock; only moves forward.
    pub clock: SimClock,

    /// Road network used for ride distances.
    pub network: RoadNetwork,

    /// Shortest-path engine.
    pub router: R,

    /// Sparse wake queue (`BTreeMap<Tick, Vec<ActorId>>`).
    pub wake_queue: WakeQueue,

    pub(crate) state:   SimulationState,
    pub(crate) pending: VecDeque<PendingRequest>,
    /// Actor table indexed by `ActorId`; finished actors leave `None`.
    pub(crate) actors:  Vec<Option<RideActor>>,
    /// Vacant slots in `actors`, reused before the table grows.
    pub(crate) free_slots: Vec<ActorId>,
    pub(crate) live:    usize,
    /// Last tick processed, so a tick is never processed twice.
    pub(crate) last_processed: Option<Tick>,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run to `config.end_tick()` and report totals.
    ///
    /// Requests that were never dispatched are dropped from the queue and
    /// counted in [`RunSummary::dropped_requests`].  Actors still suspended
    /// at the end stay where they are; a vehicle in transit stays in the
    /// transit ledger.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        log::info!(
            "simulating {} requests over {} s from unix {} ({} riders, {} parking, {} vehicles)",
            self.pending.len(),
            self.config.total_ticks,
            self.config.start_unix_secs,
            self.state.rider_count(),
            self.state.fleet().pool.len(),
            self.state.fleet().vehicles.len(),
        );

        self.run_until(self.config.end_tick(), observer)?;
        let summary = self.finish();

        log::info!(
            "run ended at {}: {} realized, {} cancelled, {} unroutable, {} in transit",
            summary.final_tick,
            summary.realized,
            summary.cancelled,
            summary.unroutable,
            summary.in_transit,
        );
        observer.on_sim_end(&self.state, &summary);
        Ok(summary)
    }

    /// Process every event tick strictly before `limit` (capped at the
    /// configured end).  Leaves pending requests queued, so it can be called
    /// repeatedly to step a run in stages.
    pub fn run_until<O: SimObserver>(&mut self, limit: Tick, observer: &mut O) -> SimResult<()> {
        let limit = limit.min(self.config.end_tick());
        while let Some(now) = self.next_event_tick() {
            if now >= limit {
                break;
            }
            self.clock.advance_to(now);
            let activity = self.process_tick(now, observer)?;
            self.last_processed = Some(now);
            observer.on_tick_end(now, &activity, &self.state);
        }
        Ok(())
    }

    /// Read-only view of the state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Consume the runner and keep the state.
    pub fn into_state(self) -> SimulationState {
        self.state
    }

    /// Requests not yet dispatched.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Actors currently searching or in transit.
    pub fn live_actors(&self) -> usize {
        self.live
    }

    /// `true` once the ride limit stops further dispatch.
    pub fn ride_limit_reached(&self) -> bool {
        self.config
            .ride_limit
            .is_some_and(|limit| self.state.realized().len() >= limit)
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// The next tick with a wake-up or a dispatchable request.
    fn next_event_tick(&self) -> Option<Tick> {
        let floor = match self.last_processed {
            Some(t) => t + 1,
            None => Tick::ZERO,
        };
        let next_wake = self.wake_queue.next_tick();
        let next_due = if self.ride_limit_reached() {
            None
        } else {
            self.pending.front().map(|p| p.due.max(floor))
        };
        match (next_wake, next_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<TickActivity> {
        let mut activity = TickActivity::default();

        // ── Phase 1: resume suspended actors ──────────────────────────────
        if let Some(woken) = self.wake_queue.drain_tick(now) {
            activity.woken = woken.len();
            for actor in woken {
                self.step_actor(actor, now, observer)?;
            }
        }

        // ── Phase 2: dispatch due requests ────────────────────────────────
        //
        // The ride limit is checked once per dispatch round, as the limit
        // counts realized rides and those only change when actors step.
        if !self.ride_limit_reached() {
            while self.pending.front().is_some_and(|p| p.due <= now) {
                let Some(next) = self.pending.pop_front() else { break };
                let id = self.spawn(next)?;
                activity.dispatched += 1;
                self.step_actor(id, now, observer)?;
            }
        }

        activity.live_actors = self.live;
        Ok(activity)
    }

    /// File a new actor, reusing a vacant slot when there is one, so the
    /// table stays as large as the peak number of live actors.
    fn spawn(&mut self, pending: PendingRequest) -> SimResult<ActorId> {
        let id = match self.free_slots.pop() {
            Some(id) => id,
            None => {
                let id = ActorId::try_from(self.actors.len())
                    .map_err(|_| SimError::ActorTableFull { live: self.live })?;
                self.actors.push(None);
                id
            }
        };
        log::debug!(
            "{} spawned for request {} (rider {}, {} -> {})",
            id, pending.request.id, pending.request.rider,
            pending.request.origin, pending.request.destination
        );
        self.actors[id.index()] = Some(RideActor::new(id, pending.request, pending.due));
        self.live += 1;
        Ok(id)
    }

    /// Step one actor and deliver its outcomes to the observer.
    ///
    /// # Panics
    /// Panics if `id` has no live actor (a wake-up for a finished actor).
    fn step_actor<O: SimObserver>(&mut self, id: ActorId, now: Tick, observer: &mut O) -> SimResult<()> {
        let Some(mut actor) = self.actors.get_mut(id.index()).and_then(Option::take) else {
            panic!("{id} woken at {now} but is not in the actor table");
        };

        let mut outcomes = Vec::new();
        let step = actor.step(&mut StepCtx {
            now,
            probe_interval_secs: self.config.probe_interval_secs,
            state:               &mut self.state,
            network:             &self.network,
            router:              &self.router,
            outcomes:            &mut outcomes,
        })?;

        for outcome in outcomes {
            match outcome {
                Outcome::Realized(i)   => observer.on_realized(&self.state.realized()[i]),
                Outcome::Cancelled(i)  => observer.on_cancelled(&self.state.cancelled()[i]),
                Outcome::Unroutable(i) => observer.on_unroutable(&self.state.unroutable()[i]),
            }
        }

        match step {
            Step::Sleep(secs) => {
                debug_assert!(secs > 0, "zero sleeps continue within the step");
                self.wake_queue.push(now + secs, id);
                self.actors[id.index()] = Some(actor);
            }
            Step::Finished => {
                self.live -= 1;
                self.free_slots.push(id);
            }
        }
        Ok(())
    }

    /// Drop whatever was never dispatched and total up.
    fn finish(&mut self) -> RunSummary {
        let dropped = self.pending.len();
        if dropped > 0 {
            let reason = if self.ride_limit_reached() { "ride limit reached" } else { "window ended" };
            log::info!("{dropped} requests never dispatched ({reason})");
            self.pending.clear();
        }

        let fleet = self.state.fleet();
        RunSummary {
            realized:         self.state.realized().len(),
            cancelled:        self.state.cancelled().len(),
            unroutable:       self.state.unroutable().len(),
            dropped_requests: dropped,
            final_tick:       self.last_processed.unwrap_or(Tick::ZERO),
            docked:           fleet.pool.docked_count(),
            in_transit:       fleet.transit.len(),
        }
    }
}
