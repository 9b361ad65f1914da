//! Plain row types handed to observers.

use rn_core::{AgentId, Tick, Vec2};
use rn_path::PursuitState;

use crate::PursuitMode;

/// One pursuer at a snapshot tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PursuerSnapshot {
    pub agent:              AgentId,
    pub tick:               Tick,
    pub position:           Vec2,
    pub heading:            Vec2,
    pub mode:               PursuitMode,
    pub state:              PursuitState,
    pub distance_to_target: f64,
}

/// Aggregate counts for one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickSummary {
    pub tick:    Tick,
    /// Pursuers that took a non-zero step.
    pub moving:  usize,
    /// Pursuers giving way to a peer.
    pub waiting: usize,
    pub quarry:  Vec2,
}
