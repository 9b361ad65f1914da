//! One pursuer: its pathfinder plus the kinematic state the tick loop owns.

use rn_core::{AgentId, Vec2};
use rn_map::{CircularMap, PathwayGeometry};
use rn_path::{Pathfinder, Peer, PursuitState, TrafficView};
use tracing::warn;

use crate::PursuitMode;

/// A pursuer taking part in a [`Sim`][crate::Sim].
#[derive(Debug)]
pub struct Pursuer {
    pub pathfinder: Pathfinder,
    pub position:   Vec2,
    /// Heading applied in the most recent tick.
    pub heading:    Vec2,
    pub mode:       PursuitMode,
    flee_target:    Option<Vec2>,
}

impl Pursuer {
    pub fn new(pathfinder: Pathfinder, position: Vec2) -> Self {
        Self {
            pathfinder,
            position,
            heading:     Vec2::ZERO,
            mode:        PursuitMode::Chase,
            flee_target: None,
        }
    }

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.pathfinder.agent()
    }

    #[inline]
    pub fn state(&self) -> PursuitState {
        self.pathfinder.state()
    }

    /// The flee target currently being routed to.
    #[inline]
    pub fn flee_target(&self) -> Option<Vec2> {
        self.flee_target
    }

    /// What the other pursuers see of this one.
    pub fn as_peer(&self) -> Peer {
        Peer {
            agent:              self.agent(),
            position:           self.position,
            is_waiting:         self.pathfinder.is_waiting(),
            distance_to_target: self.pathfinder.distance_to_target(),
        }
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    /// Re-plan for this tick.  `obstacles` are the other pursuers,
    /// `occupied` every position a flee target must keep clear of.
    pub(crate) fn plan(
        &mut self,
        mode:      PursuitMode,
        quarry:    Vec2,
        obstacles: Vec<Vec2>,
        occupied:  &[Vec2],
    ) {
        let pf = &mut self.pathfinder;
        pf.set_obstacles(obstacles);
        pf.set_threat(Some(quarry));

        match mode {
            PursuitMode::Chase => {
                self.flee_target = None;
                pf.set_target(self.position, quarry, false);
            }
            PursuitMode::Flee => {
                let trigger = pf.policy().trigger_distance;
                let reached = self
                    .flee_target
                    .is_none_or(|t| t.distance(self.position) < trigger);
                if self.mode != PursuitMode::Flee || reached {
                    self.flee_target = match pf.generate_fleeing_target(self.position, occupied) {
                        Ok(target) => Some(target),
                        Err(e) => {
                            warn!(agent = %pf.agent(), error = %e, "no flee target, holding position");
                            None
                        }
                    };
                }
                let target = self.flee_target.unwrap_or(self.position);
                pf.set_target(self.position, target, true);
            }
        }
        self.mode = mode;
    }

    /// Resolve the heading for this tick against `traffic`, then take one
    /// step of `step` map units.
    pub(crate) fn advance<T>(&mut self, map: &CircularMap, step: f64, traffic: &T)
    where
        T: TrafficView + ?Sized,
    {
        self.heading = self
            .pathfinder
            .orientation(self.position, self.mode.is_fleeing(), traffic);
        if self.heading == Vec2::ZERO {
            return;
        }
        let moved = self.position + self.heading * step;
        self.position = self.snap(map, moved, step);
    }

    /// Put `moved` back onto the map.  The next leg's pathway wins when it is
    /// within reach, so a step past a consumed waypoint lands on the pathway
    /// the route continues on.
    fn snap(&self, map: &CircularMap, moved: Vec2, step: f64) -> Vec2 {
        let reach = self.pathfinder.policy().trigger_distance + step;
        let next = self
            .pathfinder
            .route()
            .and_then(|route| route.next_leg())
            .and_then(|leg| map.pathway(leg.pathway));
        if let Some(pathway) = next {
            if pathway.distance_from_path(moved) < reach {
                return pathway.closest_to(moved);
            }
        }
        map.closest_point(moved).unwrap_or(moved)
    }
}
