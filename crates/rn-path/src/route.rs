//! Committed routes and the waypoints a pursuer follows.

use std::collections::VecDeque;

use rn_core::Vec2;
use rn_map::{CircularMap, Pathway, PathwayGeometry, PathwayId, Rotation};

// ── Leg ───────────────────────────────────────────────────────────────────────

/// One stretch of a route: travel along `pathway` until `to` is reached.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Leg {
    pub pathway:  PathwayId,
    /// Waypoint closing the leg.
    pub to:       Vec2,
    /// Sense of travel on a ring leg, fixed when the route was planned.
    /// `None` on passageways and on the degraded stay-put leg, which steer
    /// toward `to` by the shorter way.
    pub rotation: Option<Rotation>,
}

impl Leg {
    /// Unit heading at `position` for this leg, or `None` if the pathway is
    /// no longer part of `map`.
    pub fn heading(&self, map: &CircularMap, position: Vec2) -> Option<Vec2> {
        let pathway = map.pathway(self.pathway)?;
        let heading = match (pathway, self.rotation) {
            (Pathway::Ring(ring), Some(rotation)) => ring.tangent(position, rotation),
            (geometry, _) => geometry.orientate(position, self.to),
        };
        Some(heading)
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The remaining waypoints of a planned route.
///
/// The starting position is not a waypoint; the first leg leads away from
/// it.  An empty route means the pursuer has arrived.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    legs:   VecDeque<Leg>,
    length: f64,
}

impl Route {
    pub fn new(legs: impl IntoIterator<Item = Leg>, length: f64) -> Self {
        Self { legs: legs.into_iter().collect(), length }
    }

    /// Planned length at the time the route was committed.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// The leg currently being travelled.
    #[inline]
    pub fn next_leg(&self) -> Option<&Leg> {
        self.legs.front()
    }

    /// Final waypoint.
    pub fn destination(&self) -> Option<Vec2> {
        self.legs.back().map(|leg| leg.to)
    }

    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter()
    }

    /// Pathways in travel order.
    pub fn pathways(&self) -> impl Iterator<Item = PathwayId> + '_ {
        self.legs.iter().map(|leg| leg.pathway)
    }

    /// Drop every leading waypoint closer than `trigger` to `position`.
    /// Returns how many were dropped.
    pub(crate) fn consume_reached(&mut self, position: Vec2, trigger: f64) -> usize {
        let mut dropped = 0;
        while self.legs.front().is_some_and(|leg| leg.to.distance(position) < trigger) {
            self.legs.pop_front();
            dropped += 1;
        }
        dropped
    }
}
