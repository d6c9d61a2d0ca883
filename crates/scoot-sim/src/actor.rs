//! The ride actor protocol.
//!
//! Each dispatched request becomes a `RideActor`: an explicit state machine
//! that the scheduler steps until it suspends or finishes.
//!
//! ```text
//!             ┌──────── vehicle found ───────┐
//!             │                              ▼
//! Searching ──┤                       route + book ──► InTransit ──► Finished
//!   ▲   │     │                              │          (sleep)     (arrived)
//!   └───┘     └── wait limit reached ──┐     └── no road path ──┐
//!                                      │      or clock overflow │
//!   probe                              ▼                        ▼
//!   sleep                        Finished (cancelled)   Finished (unroutable)
//! ```
//!
//! The two suspension points are the probe sleep while searching and the
//! transit sleep.  Everything else happens within the step that reaches it.

use scoot_core::{ActorId, ParkingId, Tick, VehicleId};
use scoot_fleet::{FleetResult, ParkingPool, Trip};
use scoot_plan::RideRequest;
use scoot_spatial::{RoadNetwork, Router, SpatialError};

use crate::record::{CancelledRide, RealizedRide, UnroutableReason, UnroutableRide};
use crate::state::SimulationState;
use crate::{SimError, SimResult};

// ── Step protocol ─────────────────────────────────────────────────────────────

/// What an actor asks of the scheduler after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Wake me again this many seconds from now (always > 0).
    Sleep(u64),
    /// Remove me from the actor table.
    Finished,
}

/// An outcome recorded during a step, as an index into the state's list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Realized(usize),
    Cancelled(usize),
    Unroutable(usize),
}

/// Everything an actor may touch while it runs.
pub(crate) struct StepCtx<'a, R: Router> {
    pub now:                 Tick,
    pub probe_interval_secs: u64,
    pub state:               &'a mut SimulationState,
    pub network:             &'a RoadNetwork,
    pub router:              &'a R,
    pub outcomes:            &'a mut Vec<Outcome>,
}

// ── RideActor ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Searching { elapsed_secs: u64 },
    InTransit { vehicle: VehicleId, arrival: Tick },
    Finished,
}

/// One ride request being served.
#[derive(Clone, Debug)]
pub struct RideActor {
    pub id:           ActorId,
    pub request:      RideRequest,
    /// Desired start on the tick axis (clamped to 0).
    pub desired_tick: Tick,
    phase:            Phase,
}

/// Where a vehicle was found.
struct Pickup {
    parking:  ParkingId,
    vehicle:  VehicleId,
    attempts: u32,
}

impl RideActor {
    pub fn new(id: ActorId, request: RideRequest, desired_tick: Tick) -> Self {
        Self { id, request, desired_tick, phase: Phase::Searching { elapsed_secs: 0 } }
    }

    /// `true` while the actor waits for a vehicle.
    pub fn is_searching(&self) -> bool {
        matches!(self.phase, Phase::Searching { .. })
    }

    /// The vehicle this actor is riding, if it is in transit.
    pub fn vehicle_in_transit(&self) -> Option<VehicleId> {
        match self.phase {
            Phase::InTransit { vehicle, .. } => Some(vehicle),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Run until the next suspension point or the end of the protocol.
    pub(crate) fn step<R: Router>(&mut self, ctx: &mut StepCtx<'_, R>) -> SimResult<Step> {
        loop {
            match self.phase {
                Phase::Searching { elapsed_secs } => {
                    if let Some(pickup) = self.find_vehicle(&mut ctx.state.fleet_mut().pool)? {
                        self.phase = self.start_ride(ctx, pickup, elapsed_secs)?;
                        continue;
                    }

                    let wait_limit = ctx
                        .state
                        .rider(self.request.rider)
                        .map(|r| r.wait_limit_secs)
                        .ok_or(SimError::RiderNotFound(self.request.rider))?;
                    if elapsed_secs >= wait_limit {
                        self.cancel(ctx, elapsed_secs);
                        self.phase = Phase::Finished;
                        continue;
                    }

                    let probe = ctx.probe_interval_secs;
                    self.phase = Phase::Searching { elapsed_secs: elapsed_secs + probe };
                    return Ok(Step::Sleep(probe));
                }

                Phase::InTransit { vehicle, arrival } => {
                    if ctx.now < arrival {
                        return Ok(Step::Sleep(arrival.since(ctx.now)));
                    }
                    let trip = ctx.state.fleet_mut().arrive(vehicle)?;
                    log::debug!(
                        "{} request {}: {} docked at {} ({:.0} m)",
                        self.id, self.request.id, vehicle, trip.to_parking, trip.distance_m
                    );
                    self.phase = Phase::Finished;
                }

                Phase::Finished => return Ok(Step::Finished),
            }
        }
    }

    // ── findVehicle ───────────────────────────────────────────────────────

    /// Take from the origin if it has stock, else from the best-stocked
    /// neighbour (ties keep neighbour order).  `None` if nothing is
    /// available anywhere.
    fn find_vehicle(&self, pool: &mut ParkingPool) -> FleetResult<Option<Pickup>> {
        let origin = self.request.origin;
        if let Some(vehicle) = pool.take(origin)? {
            return Ok(Some(Pickup { parking: origin, vehicle, attempts: 0 }));
        }

        let Some(best) = rank_by_stock(pool, origin, Ranking::MostStocked)? else {
            return Ok(None);
        };
        if pool.stock_len(best)? == 0 {
            return Ok(None);
        }
        Ok(pool.take(best)?.map(|vehicle| Pickup {
            parking:  best,
            vehicle,
            attempts: u32::from(best != origin),
        }))
    }

    // ── findDropoff ───────────────────────────────────────────────────────

    /// The destination, or its least-stocked neighbour when the destination
    /// is at capacity.  Returns the chosen lot and whether it was redirected.
    fn find_dropoff(&self, pool: &ParkingPool) -> FleetResult<(ParkingId, bool)> {
        let dest = self.request.destination;
        if !pool.is_at_capacity(dest)? {
            return Ok((dest, false));
        }
        match rank_by_stock(pool, dest, Ranking::LeastStocked)? {
            Some(alt) => Ok((alt, alt != dest)),
            None => Ok((dest, false)),
        }
    }

    // ── Booking ───────────────────────────────────────────────────────────

    fn start_ride<R: Router>(
        &self,
        ctx: &mut StepCtx<'_, R>,
        pickup: Pickup,
        search_secs: u64,
    ) -> SimResult<Phase> {
        let now = ctx.now;
        let rider_id = self.request.rider;
        let Pickup { parking: origin, vehicle, mut attempts } = pickup;

        let (destination, redirected) = self.find_dropoff(&ctx.state.fleet().pool)?;
        if redirected {
            attempts += 1;
            log::debug!(
                "{} request {}: {} is full, dropping off at {}",
                self.id, self.request.id, self.request.destination, destination
            );
        }

        let from_node = ctx.state.fleet().pool.node(origin)?;
        let to_node   = ctx.state.fleet().pool.node(destination)?;

        let distance_m = match ctx.router.path_length_m(ctx.network, from_node, to_node) {
            Ok(d) => d,
            Err(SpatialError::NoRoute { .. }) => {
                log::warn!(
                    "{} request {}: no road path from {} to {}; {} returned to {}",
                    self.id, self.request.id, origin, destination, vehicle, origin
                );
                return self.abandon(ctx, vehicle, origin, destination, UnroutableReason::NoRoute);
            }
            Err(e) => return Err(e.into()),
        };

        let speed_mps = ctx
            .state
            .rider(rider_id)
            .map(|r| r.speed_mps as f64)
            .ok_or(SimError::RiderNotFound(rider_id))?;
        let duration = (distance_m / speed_mps).floor();
        let Some((duration_secs, arrival)) = tick_span(now, duration) else {
            log::warn!(
                "{} request {}: {:.0} m at {} m/s does not fit the clock; {} returned to {}",
                self.id, self.request.id, distance_m, speed_mps, vehicle, origin
            );
            return self.abandon(ctx, vehicle, origin, destination, UnroutableReason::DurationOverflow);
        };
        let promo_used = ctx.state.consume_promo(rider_id)?;

        let ride = ctx.state.record_realized(RealizedRide {
            id:            Default::default(),
            request:       self.request.id,
            rider:         rider_id,
            vehicle,
            origin,
            destination,
            desired_start: self.desired_tick,
            start:         now,
            end:           arrival,
            distance_m,
            duration_secs,
            promo_used,
            search_secs,
            attempts,
        });
        ctx.outcomes.push(Outcome::Realized(ctx.state.realized().len() - 1));

        ctx.state.fleet_mut().depart(Trip {
            ride,
            rider:          rider_id,
            vehicle,
            from_parking:   origin,
            to_parking:     destination,
            from_node,
            to_node,
            departure_tick: now,
            arrival_tick:   arrival,
            distance_m,
        });
        log::debug!(
            "{} request {}: {} booked {} from {} to {}, {:.0} m in {} s",
            self.id, self.request.id, ride, vehicle, origin, destination, distance_m, duration_secs
        );

        Ok(Phase::InTransit { vehicle, arrival })
    }

    /// Give the vehicle back to the front of `origin` and record the ride
    /// as unroutable.  The rider keeps any promo credit.
    fn abandon<R: Router>(
        &self,
        ctx: &mut StepCtx<'_, R>,
        vehicle: VehicleId,
        origin: ParkingId,
        destination: ParkingId,
        reason: UnroutableReason,
    ) -> SimResult<Phase> {
        ctx.state.fleet_mut().refund(origin, vehicle)?;
        ctx.state.record_unroutable(UnroutableRide {
            request: self.request.id,
            rider:   self.request.rider,
            vehicle,
            origin,
            destination,
            tick:    ctx.now,
            reason,
        });
        ctx.outcomes.push(Outcome::Unroutable(ctx.state.unroutable().len() - 1));
        Ok(Phase::Finished)
    }

    fn cancel<R: Router>(&self, ctx: &mut StepCtx<'_, R>, search_secs: u64) {
        let id = ctx.state.record_cancelled(CancelledRide {
            id:            Default::default(),
            request:       self.request.id,
            rider:         self.request.rider,
            origin:        self.request.origin,
            desired_start: self.desired_tick,
            search_secs,
            attempts:      0,
        });
        ctx.outcomes.push(Outcome::Cancelled(ctx.state.cancelled().len() - 1));
        log::debug!(
            "{} request {}: cancelled as {} after waiting {} s at {}",
            self.id, self.request.id, id, search_secs, self.request.origin
        );
    }
}

/// `duration` seconds from `now` as whole seconds and an arrival tick.
/// `None` when the duration is not finite or runs off the tick axis; `as`
/// would saturate silently.
fn tick_span(now: Tick, duration: f64) -> Option<(u64, Tick)> {
    if !duration.is_finite() || duration < 0.0 || duration >= u64::MAX as f64 {
        return None;
    }
    let secs = duration as u64;
    now.checked_add(secs).map(|arrival| (secs, arrival))
}

// ── Neighbour ranking ─────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Ranking {
    MostStocked,
    LeastStocked,
}

/// The first neighbour of `parking` after a stable sort by current stock.
fn rank_by_stock(pool: &ParkingPool, parking: ParkingId, order: Ranking) -> FleetResult<Option<ParkingId>> {
    let mut ranked = pool
        .neighbors(parking)?
        .iter()
        .map(|&p| pool.stock_len(p).map(|n| (p, n)))
        .collect::<FleetResult<Vec<(ParkingId, usize)>>>()?;
    match order {
        Ranking::MostStocked  => ranked.sort_by(|a, b| b.1.cmp(&a.1)),
        Ranking::LeastStocked => ranked.sort_by(|a, b| a.1.cmp(&b.1)),
    }
    Ok(ranked.first().map(|&(p, _)| p))
}
