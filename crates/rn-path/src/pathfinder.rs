//! Per-pursuer pathfinder: route queries, waypoint following, yielding and
//! flee targets.
//!
//! # Query cycle
//!
//! ```text
//! set_target(current, target, avoid)
//!   place start       (blocking iff policy.agents_block_each_other)
//!   place target
//!   place obstacles   (+ threat when `avoid`), all blocking
//!   shortest_path     blocking nodes are never entered
//!   build legs        before the graph is touched again
//!   undo placements   graph back to its static edge set
//! ```
//!
//! An unreachable target, or any graph anomaly during the query, degrades to
//! a one-leg route that snaps the pursuer back onto the closest pathway.  The
//! graph is then rebuilt from the map and the query reports length `0`.
//!
//! # State
//!
//! | State       | Entered by                                   | Left by                  |
//! |-------------|----------------------------------------------|--------------------------|
//! | `Idle`      | construction                                 | `set_target`             |
//! | `Following` | `set_target`                                 | arrival, wait, freeze    |
//! | `Waiting`   | `orientation` finding a peer with right of way | the next `orientation` |
//! | `Frozen`    | `freeze`                                     | `set_target`             |
//! | `Arrived`   | last waypoint reached                        | `set_target`             |

use std::fmt;
use std::sync::Arc;

use rn_core::{approx_eq, AgentId, AgentRng, NodeId, RoutingPolicy, Vec2};
use rn_graph::{InsertStatus, Insertion, NavGraph};
use rn_map::{CircularMap, Rotation};

use crate::route::{Leg, Route};
use crate::search::{shortest_path, GraphPath};
use crate::traffic::TrafficView;
use crate::{PathError, PathResult};

/// Coarse motion state of a pursuer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PursuitState {
    Idle,
    Following,
    Waiting,
    Frozen,
    Arrived,
}

/// Graph changes made by one query.
#[derive(Default)]
struct Placements {
    /// Transient nodes, in insertion order.
    inserted:  Vec<NodeId>,
    /// Existing nodes marked blocking, with their previous flag.
    reblocked: Vec<(NodeId, bool)>,
}

/// Routes one pursuer over a shared map.
///
/// Each pathfinder owns its navigation graph; several pathfinders may share
/// the same `Arc<CircularMap>`.
pub struct Pathfinder {
    agent:              AgentId,
    map:                Arc<CircularMap>,
    graph:              NavGraph,
    policy:             RoutingPolicy,
    rng:                AgentRng,
    route:              Option<Route>,
    distance_to_target: f64,
    obstacles:          Vec<Vec2>,
    threat:             Option<Vec2>,
    frozen:             bool,
    waiting:            bool,
    recovered_edges:    u64,
}

impl Pathfinder {
    /// Build the static graph of `map` for `agent`.  Flee sampling is seeded
    /// from `seed` and the agent id.
    pub fn new(
        agent: AgentId,
        map: Arc<CircularMap>,
        policy: RoutingPolicy,
        seed: u64,
    ) -> PathResult<Self> {
        policy.validate()?;
        if map.rings().is_empty() {
            return Err(PathError::EmptyMap);
        }
        let graph = NavGraph::build(&map, policy.merge_distance)?;
        Ok(Self {
            agent,
            map,
            graph,
            policy,
            rng:                AgentRng::new(seed, agent),
            route:              None,
            distance_to_target: 0.0,
            obstacles:          Vec::new(),
            threat:             None,
            frozen:             false,
            waiting:            false,
            recovered_edges:    0,
        })
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Plan and commit a route from `current` to `target`, returning its
    /// length.  Unfreezes the pursuer.
    ///
    /// With `avoid_obstacle` the tracked threat is treated as one more
    /// blocking obstacle for this query.  Returns `0` when the target is
    /// unreachable, in which case the committed route only leads back onto
    /// the closest pathway.
    pub fn set_target(&mut self, current: Vec2, target: Vec2, avoid_obstacle: bool) -> f64 {
        self.frozen = false;
        let route = self.plan_or_stay(current, target, avoid_obstacle);
        self.distance_to_target = route.length();
        self.route = Some(route);
        self.distance_to_target
    }

    /// Route length from `a` to `b`, leaving the committed route, the
    /// remaining distance and the state untouched.
    pub fn distance_between(&mut self, a: Vec2, b: Vec2, avoid_obstacle: bool) -> f64 {
        self.plan_or_stay(a, b, avoid_obstacle).length()
    }

    fn plan_or_stay(&mut self, current: Vec2, target: Vec2, avoid_obstacle: bool) -> Route {
        match self.plan(current, target, avoid_obstacle) {
            Ok(Some(route)) => route,
            Ok(None) => {
                tracing::warn!(agent = %self.agent, %current, %target, "target unreachable; staying put");
                self.reset_graph();
                self.stay_put(current)
            }
            Err(err) => {
                tracing::warn!(agent = %self.agent, %current, %target, %err, "route query failed; staying put");
                self.reset_graph();
                self.stay_put(current)
            }
        }
    }

    /// `Ok(None)` when no path avoids the blocking nodes.
    fn plan(&mut self, current: Vec2, target: Vec2, avoid_obstacle: bool) -> PathResult<Option<Route>> {
        self.graph.ensure_current(&self.map)?;
        let mut placed = Placements::default();
        let searched = self.search(current, target, avoid_obstacle, &mut placed);
        let undone = self.undo(&placed);
        let route = searched?;
        undone?;
        Ok(route)
    }

    fn search(
        &mut self,
        current: Vec2,
        target: Vec2,
        avoid_obstacle: bool,
        placed: &mut Placements,
    ) -> PathResult<Option<Route>> {
        let start = self.place(current, self.policy.agents_block_each_other, placed)?;
        let end = self.place(target, false, placed)?;

        let mut blockers = self.obstacles.clone();
        if avoid_obstacle {
            blockers.extend(self.threat);
        }
        for position in blockers {
            self.place_obstacle(position, start, end, placed);
        }

        Ok(shortest_path(&self.graph, start, end).map(|path| self.legs_along(&path)))
    }

    /// Look up or insert the node for `position` on its closest pathway.
    fn place(&mut self, position: Vec2, is_blocking: bool, placed: &mut Placements) -> PathResult<NodeId> {
        let pathway = self.map.closest_pathway(position).ok_or(PathError::EmptyMap)?;
        let insertion = self.graph.insert_node(&self.map, pathway, position, is_blocking)?;
        self.record(insertion, placed);
        Ok(insertion.node)
    }

    /// Obstacles never fail the query: a placement error only drops that
    /// obstacle.  An obstacle on the start or target node is ignored.
    fn place_obstacle(&mut self, position: Vec2, start: NodeId, end: NodeId, placed: &mut Placements) {
        let inserted = self
            .map
            .closest_pathway(position)
            .ok_or(PathError::EmptyMap)
            .and_then(|pathway| {
                self.graph
                    .insert_node(&self.map, pathway, position, true)
                    .map_err(PathError::from)
            });
        match inserted {
            Ok(insertion) if insertion.created => self.record(insertion, placed),
            Ok(Insertion { node, .. }) if node == start || node == end => {
                tracing::debug!(agent = %self.agent, %position, "obstacle sits on an endpoint of the query");
            }
            Ok(Insertion { node, .. }) => match self.graph.set_blocking(node, true) {
                Ok(previous) => placed.reblocked.push((node, previous)),
                Err(err) => tracing::warn!(agent = %self.agent, %position, %err, "skipping obstacle"),
            },
            Err(err) => tracing::warn!(agent = %self.agent, %position, %err, "skipping obstacle"),
        }
    }

    fn record(&mut self, insertion: Insertion, placed: &mut Placements) {
        if insertion.created {
            placed.inserted.push(insertion.node);
        }
        if insertion.status == InsertStatus::Recovered {
            self.recovered_edges += 1;
        }
    }

    /// Restore blocking flags, then remove transient nodes, newest first.
    /// Every step is attempted; the first error is returned.
    fn undo(&mut self, placed: &Placements) -> PathResult<()> {
        let mut first_err = None;
        for &(node, previous) in placed.reblocked.iter().rev() {
            if let Err(err) = self.graph.set_blocking(node, previous) {
                first_err = first_err.or(Some(err));
            }
        }
        for &node in placed.inserted.iter().rev() {
            if let Err(err) = self.graph.remove_node(node) {
                first_err = first_err.or(Some(err));
            }
        }
        match first_err {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Legs of `path`.  Ring legs keep the sense of travel of the edge they
    /// were planned on.
    fn legs_along(&self, path: &GraphPath) -> Route {
        let legs = path.edges.iter().zip(path.nodes.windows(2)).filter_map(|(&edge_id, pair)| {
            let edge = self.graph.edge(edge_id)?;
            let to = self.graph.node(pair[1])?;
            let rotation = edge.pathway.is_ring().then(|| {
                if edge.a == pair[0] { Rotation::CounterClockwise } else { Rotation::Clockwise }
            });
            Some(Leg { pathway: edge.pathway, to: to.position, rotation })
        });
        Route::new(legs, path.cost)
    }

    /// Single leg leading from `current` onto the closest pathway.
    fn stay_put(&self, current: Vec2) -> Route {
        let Some(pathway) = self.map.closest_pathway(current) else {
            return Route::default();
        };
        let to = self.map.closest_point(current).unwrap_or(current);
        Route::new([Leg { pathway, to, rotation: None }], 0.0)
    }

    fn reset_graph(&mut self) {
        if let Err(err) = self.graph.rebuild_static_graph(&self.map) {
            tracing::warn!(agent = %self.agent, %err, "static graph rebuild failed");
        }
    }

    // ── Following ─────────────────────────────────────────────────────────

    /// Unit heading for this tick.
    ///
    /// First decides whether to yield to the nearest peer: a peer inside the
    /// obstacle clearance that is not itself waiting makes this pursuer wait
    /// when fleeing, or when its remaining distance is larger (approximately
    /// equal distances: the larger agent id waits).  Returns the zero vector
    /// while frozen, waiting, idle or arrived.  Waypoints closer than the
    /// trigger distance are consumed here, once each.
    pub fn orientation<T>(&mut self, current: Vec2, is_fleeing: bool, traffic: &T) -> Vec2
    where
        T: TrafficView + ?Sized,
    {
        self.waiting = self.must_yield(current, is_fleeing, traffic);
        if self.frozen || self.waiting {
            return Vec2::ZERO;
        }

        let trigger = self.policy.trigger_distance;
        let Some(route) = self.route.as_mut() else {
            return Vec2::ZERO;
        };
        route.consume_reached(current, trigger);
        match route.next_leg() {
            Some(leg) => leg.heading(&self.map, current).unwrap_or(Vec2::ZERO),
            None => Vec2::ZERO,
        }
    }

    fn must_yield<T>(&self, current: Vec2, is_fleeing: bool, traffic: &T) -> bool
    where
        T: TrafficView + ?Sized,
    {
        let Some(peer) = traffic.nearest_peer(self.agent, current) else {
            return false;
        };
        if peer.is_waiting || peer.position.distance(current) >= self.policy.obstacle_clearance {
            return false;
        }
        if is_fleeing {
            return true;
        }
        if approx_eq(self.distance_to_target, peer.distance_to_target) {
            return self.agent > peer.agent;
        }
        self.distance_to_target > peer.distance_to_target
    }

    // ── Fleeing ───────────────────────────────────────────────────────────

    /// A random map point at least `min_flee_distance` of route away from
    /// `current`.  Candidates within the merge distance of an `occupied`
    /// position, a tracked obstacle or the threat are rejected.  Route
    /// distances avoid the threat.
    pub fn generate_fleeing_target(&mut self, current: Vec2, occupied: &[Vec2]) -> PathResult<Vec2> {
        let attempts = self.policy.max_flee_attempts;
        for _ in 0..attempts {
            let candidate = self.map.random_point(self.rng.inner()).ok_or(PathError::EmptyMap)?;
            if self.is_occupied(candidate, occupied) {
                continue;
            }
            if self.distance_between(current, candidate, true) >= self.policy.min_flee_distance {
                return Ok(candidate);
            }
        }
        tracing::warn!(agent = %self.agent, %current, attempts, "no flee target found");
        Err(PathError::NoFleeTarget { attempts })
    }

    fn is_occupied(&self, candidate: Vec2, occupied: &[Vec2]) -> bool {
        let merge = self.policy.merge_distance;
        occupied
            .iter()
            .chain(&self.obstacles)
            .chain(&self.threat)
            .any(|o| o.distance(candidate) < merge)
    }

    /// Pick a flee target and route to it, avoiding the threat.
    pub fn flee(&mut self, current: Vec2, occupied: &[Vec2]) -> PathResult<f64> {
        let target = self.generate_fleeing_target(current, occupied)?;
        Ok(self.set_target(current, target, true))
    }

    // ── Obstacles ─────────────────────────────────────────────────────────

    /// Replace the tracked obstacle positions.
    pub fn set_obstacles(&mut self, obstacles: impl IntoIterator<Item = Vec2>) {
        self.obstacles = obstacles.into_iter().collect();
    }

    /// Stop tracking every obstacle at one of `removed`.
    pub fn remove_obstacles(&mut self, removed: &[Vec2]) {
        self.obstacles.retain(|o| !removed.iter().any(|r| r.same_as(*o)));
    }

    pub fn obstacles(&self) -> &[Vec2] {
        &self.obstacles
    }

    /// Position avoided by queries made with `avoid_obstacle = true`.
    pub fn set_threat(&mut self, threat: Option<Vec2>) {
        self.threat = threat;
    }

    pub fn threat(&self) -> Option<Vec2> {
        self.threat
    }

    // ── State ─────────────────────────────────────────────────────────────

    /// Halt in place without discarding the route.  Cleared by `set_target`.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Length of the last committed route.
    #[inline]
    pub fn distance_to_target(&self) -> f64 {
        self.distance_to_target
    }

    /// Final waypoint of the committed route.
    pub fn current_target(&self) -> Option<Vec2> {
        self.route.as_ref().and_then(Route::destination)
    }

    pub fn state(&self) -> PursuitState {
        if self.frozen {
            return PursuitState::Frozen;
        }
        if self.waiting {
            return PursuitState::Waiting;
        }
        match &self.route {
            None => PursuitState::Idle,
            Some(route) if route.is_empty() => PursuitState::Arrived,
            Some(_) => PursuitState::Following,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn map(&self) -> &CircularMap {
        &self.map
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Insertions that had to recreate a missing edge.  Stays `0` on a
    /// correctly built graph.
    pub fn recovered_edges(&self) -> u64 {
        self.recovered_edges
    }
}

impl fmt::Debug for Pathfinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pathfinder")
            .field("agent", &self.agent)
            .field("state", &self.state())
            .field("distance_to_target", &self.distance_to_target)
            .field("obstacles", &self.obstacles.len())
            .field("graph", &self.graph)
            .finish()
    }
}
