//! Simulated time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  One tick is one
//! simulated second; the mapping to wall-clock time lives in `SimClock`:
//!
//!   wall_time = start_unix_secs + tick
//!
//! Integer ticks keep every duration exact.  Ride durations are truncated to
//! whole seconds when they are computed, never accumulated as floats.

use std::fmt;

use crate::{ScootError, ScootResult};

/// Seconds a rider waits between two scans for an available vehicle.
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 10;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick (seconds since simulation start).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` seconds after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// The tick `n` seconds after `self`, or `None` past the end of the
    /// tick axis.
    #[inline]
    pub fn checked_add(self, n: u64) -> Option<Tick> {
        self.0.checked_add(n).map(Tick)
    }

    /// Seconds elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The scheduler's clock: current tick plus the Unix time of tick 0.
///
/// The clock only moves forward.  [`advance_to`](Self::advance_to) refuses
/// to go backwards, which is what makes "logical time never decreases" hold
/// for every actor woken by the scheduler.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of tick 0.
    pub start_unix_secs: i64,
    /// The current tick.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64) -> Self {
        Self { start_unix_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Jump forward to `tick`.
    ///
    /// # Panics
    /// Panics if `tick` is earlier than the current tick.
    #[inline]
    pub fn advance_to(&mut self, tick: Tick) {
        assert!(
            tick >= self.current_tick,
            "simulated time must not go backwards ({} -> {})",
            self.current_tick,
            tick
        );
        self.current_tick = tick;
    }

    /// Unix timestamp of an arbitrary tick.
    #[inline]
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64
    }

    /// Current Unix timestamp.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.unix_secs_at(self.current_tick)
    }

    /// Break elapsed time into (day, hour, minute) components from sim start.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_secs = self.current_tick.0;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (day {} {:02}:{:02})", self.current_tick, d, h, m)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// The demo binary loads this from JSON (feature `serde`) and lets CLI flags
/// override individual fields.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Unix timestamp of tick 0 (the plan's start date at midnight).
    pub start_unix_secs: i64,

    /// Run bound in seconds (`end − start`).  Nothing happens at or after
    /// this tick.
    pub total_ticks: u64,

    /// Master seed for plan synthesis.  The engine itself draws no random
    /// numbers.
    pub seed: u64,

    /// Sleep between vehicle scans while a rider is searching.
    #[cfg_attr(feature = "serde", serde(default = "default_probe_interval"))]
    pub probe_interval_secs: u64,

    /// Stop dispatching new requests once this many rides are realized.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ride_limit: Option<usize>,
}

#[cfg(feature = "serde")]
fn default_probe_interval() -> u64 {
    DEFAULT_PROBE_INTERVAL_SECS
}

impl SimConfig {
    /// Config covering `[start_unix_secs, end_unix_secs)` with default probe
    /// interval, seed 0 and no ride limit.
    pub fn for_window(start_unix_secs: i64, end_unix_secs: i64) -> Self {
        Self {
            start_unix_secs,
            total_ticks: end_unix_secs.saturating_sub(start_unix_secs).max(0) as u64,
            seed: 0,
            probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS,
            ride_limit: None,
        }
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs)
    }

    /// Map a Unix timestamp onto the tick axis.  Times before the start
    /// clamp to tick 0.
    #[inline]
    pub fn tick_at(&self, unix_secs: i64) -> Tick {
        Tick(unix_secs.saturating_sub(self.start_unix_secs).max(0) as u64)
    }

    /// Reject configurations the scheduler cannot run.
    pub fn validate(&self) -> ScootResult<()> {
        if self.total_ticks == 0 {
            return Err(ScootError::Config("simulation window is empty".into()));
        }
        if self.probe_interval_secs == 0 {
            return Err(ScootError::Config("probe_interval_secs must be > 0".into()));
        }
        Ok(())
    }
}
