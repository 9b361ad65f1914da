//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  One tick
//! is one heading query per pursuer.  The mapping to simulated seconds is held
//! in `SimClock`:
//!
//!   elapsed_secs = tick * tick_secs
//!
//! The default tick is 1/30 s, matching a frame-driven movement loop.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
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

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts tick counts to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub tick_secs: f64,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_secs: f64) -> Self {
        Self { tick_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_secs
    }

    /// How many ticks span `secs` seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs / self.tick_secs).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration of a pursuit run.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per tick.
    pub tick_secs: f64,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Pursuer speed in map units per second.
    pub agent_speed: f64,

    /// Report a snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_secs)
    }

    /// Distance one pursuer covers in a single tick.
    #[inline]
    pub fn step_length(&self) -> f64 {
        self.agent_speed * self.tick_secs
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_secs:             1.0 / 30.0,
            total_ticks:           900,
            seed:                  42,
            agent_speed:           2.5,
            output_interval_ticks: 1,
        }
    }
}
