//! Routing policy shared by every pathfinder built from the same settings.

use crate::{CoreError, CoreResult};

/// Tunables for graph lookups, waypoint consumption, yielding and fleeing.
///
/// One policy is passed to each pathfinder at construction.  Several
/// pathfinders may be built from clones of the same policy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingPolicy {
    /// When set, the node inserted at a pursuer's own position is blocking,
    /// so pursuers block each other's routes.
    pub agents_block_each_other: bool,

    /// Two graph nodes closer than this are the same node.
    pub merge_distance: f64,

    /// A waypoint counts as reached once the pursuer is closer than this.
    pub trigger_distance: f64,

    /// Radius within which the nearest peer triggers the yielding check.
    pub obstacle_clearance: f64,

    /// Minimum route distance between a fleeing pursuer and its flee target.
    pub min_flee_distance: f64,

    /// Number of random samples tried before flee generation gives up.
    pub max_flee_attempts: u32,
}

impl RoutingPolicy {
    /// Map margin the clearance radius is derived from.
    pub const MARGIN: f64 = 1.0;

    /// Reject non-positive distances and a zero attempt budget.
    pub fn validate(&self) -> CoreResult<()> {
        let distances = [
            ("merge_distance", self.merge_distance),
            ("trigger_distance", self.trigger_distance),
            ("obstacle_clearance", self.obstacle_clearance),
            ("min_flee_distance", self.min_flee_distance),
        ];
        for (name, value) in distances {
            if !(value > 0.0) {
                return Err(CoreError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if self.max_flee_attempts == 0 {
            return Err(CoreError::Config("max_flee_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            agents_block_each_other: true,
            merge_distance:          0.2,
            trigger_distance:        0.4,
            obstacle_clearance:      1.35 * Self::MARGIN,
            min_flee_distance:       7.0,
            max_flee_attempts:       512,
        }
    }
}
