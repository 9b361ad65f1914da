//! `SimObserver`: hooks called by the tick loop.

use rn_core::Tick;

use crate::{PursuerSnapshot, TickSummary};

/// Callbacks fired by [`Sim::run`][crate::Sim::run] at tick boundaries.
///
/// All methods have default no-op implementations so observers only need to
/// override what they care about.
pub trait SimObserver {
    /// Called at the start of each tick, before any pursuer re-plans.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after every pursuer has moved.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called every `output_interval_ticks` ticks with one row per pursuer,
    /// in ascending `AgentId` order.
    fn on_snapshot(&mut self, _tick: Tick, _pursuers: &[PursuerSnapshot]) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
