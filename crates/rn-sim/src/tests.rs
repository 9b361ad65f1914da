//! Integration tests for rn-sim, all on the arena layout.

use std::sync::Arc;

use rn_core::{AgentId, RingId, RoutingPolicy, SimConfig, Tick, Vec2};
use rn_map::layouts::{arena, ARENA_CENTER};
use rn_map::CircularMap;
use rn_path::{PathError, PursuitState};

use crate::{
    AlwaysChase, CsvTrace, FleeWindow, ModeSelector, NoopObserver, PursuerSnapshot, PursuitMode,
    Quarry, Sim, SimBuilder, SimError, SimObserver, TickContext, TickSummary,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn arena_map() -> Arc<CircularMap> {
    Arc::new(arena().unwrap())
}

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_secs:             1.0 / 30.0,
        total_ticks,
        seed:                  42,
        agent_speed:           2.5,
        output_interval_ticks: 1,
    }
}

/// Point at `radius` from the arena center, `bearing` degrees.
fn at(radius: f64, bearing: f64) -> Vec2 {
    ARENA_CENTER + Vec2::from_bearing(bearing) * radius
}

fn sim_with<M: ModeSelector>(
    total_ticks: u64,
    selector:    M,
    starts:      Vec<Vec2>,
    quarry:      Quarry,
) -> Sim<M> {
    SimBuilder::new(test_config(total_ticks), arena_map(), selector)
        .pursuers(starts)
        .quarry(quarry)
        .build()
        .unwrap()
}

/// The quarry used by most scenarios: the inner ring's anchor.
fn inner_quarry() -> Quarry {
    Quarry::Fixed(at(0.7, 150.0))
}

fn chase(total_ticks: u64, starts: Vec<Vec2>) -> Sim<AlwaysChase> {
    sim_with(total_ticks, AlwaysChase, starts, inner_quarry())
}

fn flee_until(total_ticks: u64, end: u64, starts: Vec<Vec2>) -> Sim<FleeWindow> {
    sim_with(total_ticks, FleeWindow::new(Tick(0), Tick(end)), starts, inner_quarry())
}

/// Records every snapshot and summary.
#[derive(Default)]
struct Recorder {
    starts:    usize,
    summaries: Vec<TickSummary>,
    snapshots: Vec<PursuerSnapshot>,
    ended:     Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(*summary);
    }
    fn on_snapshot(&mut self, _tick: Tick, pursuers: &[PursuerSnapshot]) {
        self.snapshots.extend_from_slice(pursuers);
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(test_config(10), arena_map(), AlwaysChase)
            .pursuers(vec![at(2.1, 90.0)])
            .build()
            .unwrap();
        assert_eq!(sim.pursuers.len(), 1);
        assert_eq!(sim.pursuers[0].agent(), AgentId(0));
        assert!(sim.quarry_position().distance(at(0.7, 0.0)) < 1e-9);
        assert_eq!(sim.clock.current_tick, Tick::ZERO);
    }

    #[test]
    fn starts_are_snapped_onto_the_map() {
        let sim = chase(10, vec![at(2.2, 90.0)]);
        assert!(sim.pursuers[0].position.distance(at(2.1, 90.0)) < 1e-9);
    }

    #[test]
    fn no_pursuers_errors() {
        let result = SimBuilder::new(test_config(10), arena_map(), AlwaysChase).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn off_map_start_errors() {
        let result = SimBuilder::new(test_config(10), arena_map(), AlwaysChase)
            .pursuers(vec![at(2.1, 90.0), at(10.0, 0.0)])
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn unknown_orbit_ring_errors() {
        let result = SimBuilder::new(test_config(10), arena_map(), AlwaysChase)
            .pursuers(vec![at(2.1, 90.0)])
            .quarry(Quarry::Orbit { ring: RingId(9), bearing: 0.0, degrees_per_tick: 1.0 })
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn zero_tick_duration_errors() {
        let mut config = test_config(10);
        config.tick_secs = 0.0;
        let result = SimBuilder::new(config, arena_map(), AlwaysChase)
            .pursuers(vec![at(2.1, 90.0)])
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_policy_surfaces_path_error() {
        let policy = RoutingPolicy { merge_distance: -1.0, ..RoutingPolicy::default() };
        let result = SimBuilder::new(test_config(10), arena_map(), AlwaysChase)
            .policy(policy)
            .pursuers(vec![at(2.1, 90.0)])
            .build();
        assert!(matches!(result, Err(SimError::Path(PathError::Core(_)))));
    }

    #[test]
    fn pursuers_share_the_map() {
        let map = arena_map();
        let sim = SimBuilder::new(test_config(10), Arc::clone(&map), AlwaysChase)
            .pursuers(vec![at(2.1, 90.0), at(3.5, 200.0)])
            .build()
            .unwrap();
        assert_eq!(Arc::strong_count(&map), 2 + sim.pursuers.len());
    }
}

// ── Tick loop and observer hooks ──────────────────────────────────────────────

#[cfg(test)]
mod loop_tests {
    use super::*;

    #[test]
    fn run_fires_every_hook() {
        let mut sim = chase(12, vec![at(3.5, 300.0), at(5.0, 200.0)]);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.starts, 12);
        assert_eq!(rec.summaries.len(), 12);
        assert_eq!(rec.snapshots.len(), 24);
        assert_eq!(rec.ended, Some(Tick(12)));
        assert_eq!(sim.clock.current_tick, Tick(12));
    }

    #[test]
    fn snapshot_interval_is_respected() {
        let mut config = test_config(10);
        config.output_interval_ticks = 5;
        let mut sim = SimBuilder::new(config, arena_map(), AlwaysChase)
            .pursuers(vec![at(3.5, 300.0)])
            .quarry(Quarry::Fixed(at(0.7, 150.0)))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        let ticks: Vec<Tick> = rec.snapshots.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![Tick(0), Tick(5)]);
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = chase(5, vec![at(3.5, 300.0)]);
        let mut rec = Recorder::default();
        sim.run_ticks(8, &mut rec).unwrap();

        assert_eq!(sim.clock.current_tick, Tick(8));
        assert_eq!(rec.starts, 8);
        assert_eq!(rec.ended, None);
    }

    #[test]
    fn snapshot_rows_are_in_agent_order() {
        let mut sim = chase(1, vec![at(3.5, 300.0), at(5.0, 200.0), at(2.1, 180.0)]);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        let agents: Vec<AgentId> = rec.snapshots.iter().map(|s| s.agent).collect();
        assert_eq!(agents, vec![AgentId(0), AgentId(1), AgentId(2)]);
    }

    #[test]
    fn pursuers_move_one_step_per_tick() {
        let mut sim = chase(1, vec![at(3.5, 300.0)]);
        let before = sim.pursuers[0].position;
        sim.run(&mut NoopObserver).unwrap();
        let after = sim.pursuers[0].position;

        let step = test_config(1).step_length();
        assert!(after.distance(before) > 0.0);
        assert!(after.distance(before) <= step + 1e-9);
        assert_eq!(sim.pursuers[0].state(), PursuitState::Following);
    }
}

// ── Chasing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod chase_tests {
    use super::*;

    #[test]
    fn lone_pursuer_reaches_the_quarry() {
        let quarry = at(0.7, 150.0);
        let mut sim = sim_with(900, AlwaysChase, vec![at(3.5, 300.0)], Quarry::Fixed(quarry));
        sim.run(&mut NoopObserver).unwrap();

        let trigger = RoutingPolicy::default().trigger_distance;
        let pursuer = &sim.pursuers[0];
        assert!(pursuer.position.distance(quarry) < trigger + 0.01, "{}", pursuer.position);
        assert_eq!(pursuer.heading, Vec2::ZERO);
    }

    #[test]
    fn pursuers_stay_on_the_map() {
        let map = arena_map();
        let mut sim = chase(600, vec![at(3.5, 300.0), at(5.0, 200.0)]);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        for snap in &rec.snapshots {
            assert!(!map.is_cheating(snap.position), "{snap:?}");
        }
    }

    #[test]
    fn one_of_two_pursuers_reaches_the_quarry() {
        let quarry = at(0.7, 150.0);
        let starts = vec![at(3.5, 300.0), at(5.0, 200.0)];
        let mut sim = sim_with(900, AlwaysChase, starts, Quarry::Fixed(quarry));
        sim.run(&mut NoopObserver).unwrap();

        let nearest = sim
            .positions()
            .iter()
            .map(|p| p.distance(quarry))
            .fold(f64::INFINITY, f64::min);
        assert!(nearest < RoutingPolicy::default().trigger_distance + 0.01);
    }

    #[test]
    fn graphs_are_restored_between_ticks() {
        let mut sim = chase(50, vec![at(3.5, 300.0), at(5.0, 200.0)]);
        sim.run(&mut NoopObserver).unwrap();

        for pursuer in &sim.pursuers {
            assert_eq!(pursuer.pathfinder.graph().node_count(), 12);
            assert_eq!(pursuer.pathfinder.graph().edge_count(), 17);
        }
    }

    #[test]
    fn trailing_pursuer_waits() {
        // Agent 0 is 0.5 from the quarry; agent 1 is about 1.26 away and
        // within clearance of agent 0.
        let starts = vec![at(2.35, 0.0), at(3.5, 10.0)];
        let mut sim = sim_with(1, AlwaysChase, starts, Quarry::Fixed(at(2.85, 0.0)));
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.summaries[0].waiting, 1);
        assert_eq!(rec.summaries[0].moving, 1);
        assert_eq!(sim.pursuers[1].state(), PursuitState::Waiting);
        assert_ne!(sim.pursuers[0].heading, Vec2::ZERO);
    }

    #[test]
    fn orbiting_quarry_is_followed() {
        let quarry = Quarry::Orbit { ring: RingId(1), bearing: 90.0, degrees_per_tick: 0.5 };
        let mut sim = sim_with(3, AlwaysChase, vec![at(3.5, 300.0)], quarry);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert!(rec.summaries[0].quarry.distance(at(2.1, 90.0)) < 1e-9);
        assert!(rec.summaries[2].quarry.distance(at(2.1, 91.0)) < 1e-9);
        assert!(sim.quarry_position().distance(at(2.1, 91.5)) < 1e-9);
    }
}

// ── Fleeing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod flee_tests {
    use super::*;

    #[test]
    fn flee_target_is_far_enough() {
        let mut sim = flee_until(1, 100, vec![at(3.5, 300.0)]);
        let start = sim.pursuers[0].position;
        sim.run(&mut NoopObserver).unwrap();

        let pursuer = &mut sim.pursuers[0];
        assert_eq!(pursuer.mode, PursuitMode::Flee);
        let target = pursuer.flee_target().unwrap();
        let distance = pursuer.pathfinder.distance_between(start, target, true);
        assert!(distance >= RoutingPolicy::default().min_flee_distance, "{distance}");
    }

    #[test]
    fn flee_target_is_kept_while_travelling() {
        let mut sim = flee_until(10, 100, vec![at(3.5, 300.0)]);
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let first = sim.pursuers[0].flee_target();
        sim.run_ticks(5, &mut NoopObserver).unwrap();

        assert!(first.is_some());
        assert_eq!(sim.pursuers[0].flee_target(), first);
    }

    #[test]
    fn window_end_switches_back_to_chase() {
        let mut sim = flee_until(20, 10, vec![at(3.5, 300.0)]);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert!(rec.snapshots.iter().filter(|s| s.tick < Tick(10)).all(|s| s.mode == PursuitMode::Flee));
        assert!(rec.snapshots.iter().filter(|s| s.tick >= Tick(10)).all(|s| s.mode == PursuitMode::Chase));
        assert_eq!(sim.pursuers[0].flee_target(), None);
    }

    #[test]
    fn fleeing_pursuers_stay_on_the_map() {
        let map = arena_map();
        let mut sim = flee_until(300, 300, vec![at(3.5, 300.0), at(5.0, 200.0)]);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        for snap in &rec.snapshots {
            assert!(!map.is_cheating(snap.position), "{snap:?}");
        }
    }

    #[test]
    fn runs_are_deterministic() {
        let run = || {
            let mut sim = flee_until(150, 60, vec![at(3.5, 300.0), at(5.0, 200.0)]);
            sim.run(&mut NoopObserver).unwrap();
            sim.positions()
        };
        assert_eq!(run(), run());
    }
}

// ── Mode selection ────────────────────────────────────────────────────────────

#[cfg(test)]
mod mode_tests {
    use super::*;

    #[test]
    fn flee_window_is_half_open() {
        let window = FleeWindow::new(Tick(5), Tick(10));
        assert!(!window.contains(Tick(4)));
        assert!(window.contains(Tick(5)));
        assert!(window.contains(Tick(9)));
        assert!(!window.contains(Tick(10)));
    }

    #[test]
    fn closures_select_per_agent() {
        let selector = |agent: AgentId, _ctx: &TickContext<'_>| {
            if agent == AgentId(0) { PursuitMode::Flee } else { PursuitMode::Chase }
        };
        let mut sim = sim_with(1, selector, vec![at(3.5, 300.0), at(5.0, 200.0)], inner_quarry());
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.pursuers[0].mode, PursuitMode::Flee);
        assert_eq!(sim.pursuers[1].mode, PursuitMode::Chase);
    }

    #[test]
    fn selector_sees_the_tick() {
        let selector = |_agent: AgentId, ctx: &TickContext<'_>| {
            assert_eq!(ctx.positions.len(), 1);
            if ctx.tick.0 % 2 == 0 { PursuitMode::Chase } else { PursuitMode::Flee }
        };
        let mut sim = sim_with(4, selector, vec![at(3.5, 300.0)], inner_quarry());
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        let modes: Vec<PursuitMode> = rec.snapshots.iter().map(|s| s.mode).collect();
        assert_eq!(modes, vec![PursuitMode::Chase, PursuitMode::Flee, PursuitMode::Chase, PursuitMode::Flee]);
    }

    #[test]
    fn mode_display() {
        assert_eq!(PursuitMode::Chase.to_string(), "chase");
        assert_eq!(PursuitMode::Flee.to_string(), "flee");
    }
}

// ── Quarry ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod quarry_tests {
    use super::*;

    #[test]
    fn orbit_wraps_bearing() {
        let map = arena_map();
        let mut quarry = Quarry::Orbit { ring: RingId(1), bearing: 350.0, degrees_per_tick: 20.0 };
        quarry.advance();
        assert!(quarry.position(&map).distance(at(2.1, 10.0)) < 1e-9);
    }

    #[test]
    fn fixed_quarry_does_not_move() {
        let map = arena_map();
        let mut quarry = Quarry::Fixed(at(0.7, 150.0));
        quarry.advance();
        assert_eq!(quarry.position(&map), at(0.7, 150.0));
    }

    #[test]
    fn off_map_quarry_is_rejected() {
        let map = arena_map();
        assert!(Quarry::Fixed(at(10.0, 0.0)).validate(&map).is_err());
        assert!(Quarry::Fixed(at(0.7, 0.0)).validate(&map).is_ok());
    }
}

// ── CSV trace ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trace_tests {
    use super::*;
    use crate::trace::{SNAPSHOT_FILE, SUMMARY_FILE};

    fn count_records(path: &std::path::Path) -> (Vec<String>, usize) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = reader.records().map(|r| r.unwrap()).count();
        (headers, rows)
    }

    #[test]
    fn writes_snapshots_and_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(10);
        config.output_interval_ticks = 5;
        let mut sim = SimBuilder::new(config, arena_map(), AlwaysChase)
            .pursuers(vec![at(3.5, 300.0), at(5.0, 200.0)])
            .quarry(Quarry::Fixed(at(0.7, 150.0)))
            .build()
            .unwrap();

        let mut trace = CsvTrace::new(dir.path()).unwrap();
        sim.run(&mut trace).unwrap();
        assert!(trace.take_error().is_none());

        let (headers, rows) = count_records(&dir.path().join(SNAPSHOT_FILE));
        assert_eq!(headers[0], "agent_id");
        assert_eq!(headers.len(), 9);
        assert_eq!(rows, 4);

        let (headers, rows) = count_records(&dir.path().join(SUMMARY_FILE));
        assert_eq!(headers, vec!["tick", "moving", "waiting", "quarry_x", "quarry_y"]);
        assert_eq!(rows, 10);
    }

    #[test]
    fn snapshot_rows_carry_mode_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = chase(1, vec![at(3.5, 300.0)]);
        let mut trace = CsvTrace::new(dir.path()).unwrap();
        sim.run(&mut trace).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join(SNAPSHOT_FILE)).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "0");
        assert_eq!(&row[1], "0");
        assert_eq!(&row[6], "chase");
        assert_eq!(&row[7], "Following");
    }

    #[test]
    fn missing_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvTrace::new(&dir.path().join("absent"));
        assert!(result.is_err());
    }
}
