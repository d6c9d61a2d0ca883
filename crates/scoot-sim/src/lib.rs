//! `scoot-sim` — the discrete-event ride engine for `scootsim`.
//!
//! # Event loop
//!
//! ```text
//! loop:
//!   now = min(next wake-up, next due request)        stop at end_tick
//!   ① Wake      — resume actors suspended until `now`, in suspension order.
//!   ② Dispatch  — unless the ride limit is reached, each request due at or
//!                 before `now` becomes a RideActor, stepped right away.
//!   ③ Observe   — SimObserver::on_tick_end(now, activity, state).
//! ```
//!
//! A [`RideActor`] step runs the ride protocol until the next suspension:
//! the probe sleep while searching for a vehicle, or the transit sleep.
//! Everything in between (pickup, drop-off choice, routing, booking) is
//! atomic with respect to other actors, which is what keeps every vehicle in
//! exactly one place between steps.
//!
//! # Crate layout
//!
//! | Module         | Contents                                             |
//! |----------------|------------------------------------------------------|
//! | [`builder`]    | `SimBuilder`: plan validation and fleet loading      |
//! | [`sim`]        | `Sim`: the scheduler                                 |
//! | [`actor`]      | `RideActor`, `Step`: the ride protocol               |
//! | [`state`]      | `SimulationState`: fleet, riders, outcome lists      |
//! | [`record`]     | `RealizedRide`, `CancelledRide`, `UnroutableRide`, `RunSummary` |
//! | [`observer`]   | `SimObserver`, `TickActivity`, `NoopObserver`        |
//! | [`wake_queue`] | `WakeQueue`: sparse tick → actors map                |
//! | [`error`]      | `SimError`, `SimResult<T>`                           |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | FxHash for the rider and fleet maps.                    |
//! | `serde`   | `Serialize`/`Deserialize` on records and `RunSummary`.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use scoot_sim::{NoopObserver, SimBuilder};
//! use scoot_spatial::{CachedRouter, DijkstraRouter};
//!
//! let mut sim = SimBuilder::from_plan(plan, CachedRouter::new(DijkstraRouter))
//!     .network(network)
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("{} rides, {} cancelled", summary.realized, summary.cancelled);
//! ```

pub mod actor;
pub mod builder;
pub mod error;
pub mod observer;
pub mod record;
pub mod sim;
pub mod state;
pub mod wake_queue;


pub use actor::{RideActor, Step};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickActivity};
pub use record::{CancelledRide, RealizedRide, RunSummary, UnroutableReason, UnroutableRide};
pub use sim::Sim;
pub use state::SimulationState;
pub use wake_queue::WakeQueue;
