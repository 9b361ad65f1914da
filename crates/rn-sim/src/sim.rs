//! The `Sim` struct and its tick loop.

use std::sync::Arc;

use rn_core::{SimClock, SimConfig, Tick, Vec2};
use rn_map::CircularMap;
use rn_path::{Peer, PursuitState};

use crate::{
    ModeSelector, PursuerSnapshot, PursuitMode, Pursuer, Quarry, SimObserver, SimResult,
    TickContext, TickSummary,
};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The pursuit simulation runner.
///
/// `Sim<M>` holds every pursuer and drives the three-phase tick loop:
///
/// 1. **Modes** (sequential): ask the [`ModeSelector`] whether each pursuer
///    chases or flees this tick.
/// 2. **Plan** (optionally parallel with the `parallel` feature): every
///    pursuer treats the others' positions as obstacles and re-plans toward
///    the quarry or its flee target.
/// 3. **Move** (sequential, ascending `AgentId`): resolve each heading
///    against the peer view, take one step and snap back onto the map.  A
///    pursuer that starts waiting is visible to every later pursuer in the
///    same tick.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<M: ModeSelector> {
    /// Global configuration (total ticks, seed, tick duration, speed).
    pub config: SimConfig,

    /// Simulation clock.
    pub clock: SimClock,

    /// The map every pursuer routes over.
    pub map: Arc<CircularMap>,

    /// Pursuers indexed by `AgentId`.
    pub pursuers: Vec<Pursuer>,

    /// The position being chased.
    pub quarry: Quarry,

    /// Chase/flee decision source.
    pub selector: M,
}

impl<M: ModeSelector> Sim<M> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.step(now, observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step(now, observer);
        }
        Ok(())
    }

    /// Current quarry position.
    pub fn quarry_position(&self) -> Vec2 {
        self.quarry.position(&self.map)
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.pursuers.iter().map(|p| p.position).collect()
    }

    /// One row per pursuer, as reported to observers.
    pub fn snapshot(&self) -> Vec<PursuerSnapshot> {
        let tick = self.clock.current_tick;
        self.pursuers
            .iter()
            .map(|p| PursuerSnapshot {
                agent:              p.agent(),
                tick,
                position:           p.position,
                heading:            p.heading,
                mode:               p.mode,
                state:              p.state(),
                distance_to_target: p.pathfinder.distance_to_target(),
            })
            .collect()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        observer.on_tick_start(now);
        let summary = self.process_tick(now);
        observer.on_tick_end(&summary);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.snapshot());
        }
        self.quarry.advance();
        self.clock.advance();
    }

    fn process_tick(&mut self, now: Tick) -> TickSummary {
        let quarry = self.quarry_position();
        let positions = self.positions();

        // ── Phase 1: modes ────────────────────────────────────────────────
        let ctx = TickContext { tick: now, quarry, positions: &positions };
        let modes: Vec<PursuitMode> = self
            .pursuers
            .iter()
            .map(|p| self.selector.mode(p.agent(), &ctx))
            .collect();

        // ── Phase 2: plan ─────────────────────────────────────────────────
        //
        // Flee targets keep clear of every pursuer and of the quarry.
        let mut occupied = positions.clone();
        occupied.push(quarry);
        self.plan_all(&modes, quarry, &positions, &occupied);

        // ── Phase 3: move ─────────────────────────────────────────────────
        let step = self.config.step_length();
        let map = Arc::clone(&self.map);
        let mut peers: Vec<Peer> = self.pursuers.iter().map(Pursuer::as_peer).collect();
        let mut moving = 0;
        let mut waiting = 0;
        for (i, pursuer) in self.pursuers.iter_mut().enumerate() {
            pursuer.advance(&map, step, peers.as_slice());
            peers[i] = pursuer.as_peer();
            if pursuer.heading != Vec2::ZERO {
                moving += 1;
            }
            if pursuer.state() == PursuitState::Waiting {
                waiting += 1;
            }
        }

        TickSummary { tick: now, moving, waiting, quarry }
    }

    /// Re-plan every pursuer.  With the `parallel` Cargo feature the
    /// pursuers plan on Rayon's thread pool; each owns its graph, so the
    /// result does not depend on scheduling.
    fn plan_all(
        &mut self,
        modes:     &[PursuitMode],
        quarry:    Vec2,
        positions: &[Vec2],
        occupied:  &[Vec2],
    ) {
        let others = |i: usize| -> Vec<Vec2> {
            positions
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &p)| p)
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        {
            self.pursuers
                .iter_mut()
                .zip(modes)
                .enumerate()
                .for_each(|(i, (pursuer, &mode))| pursuer.plan(mode, quarry, others(i), occupied));
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.pursuers
                .par_iter_mut()
                .zip(modes.par_iter())
                .enumerate()
                .for_each(|(i, (pursuer, &mode))| pursuer.plan(mode, quarry, others(i), occupied));
        }
    }
}
