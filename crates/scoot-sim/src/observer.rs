//! Simulation observer trait for progress reporting and data collection.

use scoot_core::Tick;

use crate::record::{CancelledRide, RealizedRide, RunSummary, UnroutableRide};
use crate::state::SimulationState;

/// What happened on one processed tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickActivity {
    /// Suspended actors resumed this tick.
    pub woken:       usize,
    /// Requests turned into new actors this tick.
    pub dispatched:  usize,
    /// Actors still alive (searching or in transit) after the tick.
    pub live_actors: usize,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// Only ticks on which something happens are reported; the scheduler skips
/// idle seconds.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl SimObserver for Progress {
///     fn on_tick_end(&mut self, tick: Tick, activity: &TickActivity, _: &SimulationState) {
///         if tick.0 % self.every == 0 {
///             log::info!("{tick}: {} live rides", activity.live_actors);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after every processed tick, with the state as it stands
    /// between ride steps.
    fn on_tick_end(&mut self, _tick: Tick, _activity: &TickActivity, _state: &SimulationState) {}

    /// Called as soon as a ride is booked.
    fn on_realized(&mut self, _ride: &RealizedRide) {}

    /// Called as soon as a rider gives up.
    fn on_cancelled(&mut self, _ride: &CancelledRide) {}

    /// Called when a ride is abandoned for lack of a road path.
    fn on_unroutable(&mut self, _ride: &UnroutableRide) {}

    /// Called once after the run ends.
    fn on_sim_end(&mut self, _state: &SimulationState, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
