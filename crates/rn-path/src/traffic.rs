//! What a pursuer can see of the other pursuers when deciding whether to yield.

use rn_core::{AgentId, Vec2};

/// A snapshot of one pursuer, as seen by the others during a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Peer {
    pub agent:              AgentId,
    pub position:           Vec2,
    pub is_waiting:         bool,
    pub distance_to_target: f64,
}

/// Source of peer snapshots.
///
/// The simulation driver implements this over its agent table; tests use a
/// plain slice of [`Peer`]s.
pub trait TrafficView {
    /// The peer nearest to `position`, excluding `agent` itself.
    fn nearest_peer(&self, agent: AgentId, position: Vec2) -> Option<Peer>;
}

impl TrafficView for [Peer] {
    fn nearest_peer(&self, agent: AgentId, position: Vec2) -> Option<Peer> {
        self.iter()
            .filter(|p| p.agent != agent)
            .min_by(|a, b| a.position.distance(position).total_cmp(&b.position.distance(position)))
            .copied()
    }
}

impl TrafficView for Vec<Peer> {
    fn nearest_peer(&self, agent: AgentId, position: Vec2) -> Option<Peer> {
        self.as_slice().nearest_peer(agent, position)
    }
}

/// No other pursuers.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyRoad;

impl TrafficView for EmptyRoad {
    fn nearest_peer(&self, _agent: AgentId, _position: Vec2) -> Option<Peer> {
        None
    }
}
