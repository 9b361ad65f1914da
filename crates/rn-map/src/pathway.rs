//! The walkable-curve capability shared by rings and passageways.
//!
//! Graph edges and route legs refer to pathways by [`PathwayId`]; the geometry
//! itself is resolved through [`CircularMap::pathway`](crate::CircularMap::pathway),
//! which returns a [`Pathway`] value implementing [`PathwayGeometry`].

use std::fmt;

use rand::Rng;

use rn_core::{PassageId, RingId, Vec2};

use crate::passage::Passageway;
use crate::ring::Ring;

// ── PathwayGeometry ───────────────────────────────────────────────────────────

/// Queries every walkable curve answers.
pub trait PathwayGeometry {
    /// Point on the pathway closest to `target`.
    fn closest_to(&self, target: Vec2) -> Vec2;

    /// Distance from `target` to the pathway.
    fn distance_from_path(&self, target: Vec2) -> f64;

    /// Travel distance between two points on the pathway.  On a ring,
    /// `force_detour` takes the longer arc; a passageway ignores it.
    fn distance_between(&self, a: Vec2, b: Vec2, force_detour: bool) -> f64;

    /// Unit direction of travel at `position` that moves toward `target`.
    fn orientate(&self, position: Vec2, target: Vec2) -> Vec2;

    /// A point drawn uniformly along the pathway.
    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2;

    fn is_on(&self, point: Vec2) -> bool;

    /// Total walkable length.
    fn length(&self) -> f64;
}

// ── Pathway ───────────────────────────────────────────────────────────────────

/// Either kind of walkable curve, by value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Pathway {
    Ring(Ring),
    Passage(Passageway),
}

impl PathwayGeometry for Pathway {
    fn closest_to(&self, target: Vec2) -> Vec2 {
        match self {
            Pathway::Ring(r) => r.closest_to(target),
            Pathway::Passage(p) => p.closest_to(target),
        }
    }

    fn distance_from_path(&self, target: Vec2) -> f64 {
        match self {
            Pathway::Ring(r) => r.distance_from_path(target),
            Pathway::Passage(p) => p.distance_from_path(target),
        }
    }

    fn distance_between(&self, a: Vec2, b: Vec2, force_detour: bool) -> f64 {
        match self {
            Pathway::Ring(r) => r.distance_between(a, b, force_detour),
            Pathway::Passage(p) => p.distance_between(a, b, force_detour),
        }
    }

    fn orientate(&self, position: Vec2, target: Vec2) -> Vec2 {
        match self {
            Pathway::Ring(r) => r.orientate(position, target),
            Pathway::Passage(p) => p.orientate(position, target),
        }
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        match self {
            Pathway::Ring(r) => r.random_point(rng),
            Pathway::Passage(p) => p.random_point(rng),
        }
    }

    fn is_on(&self, point: Vec2) -> bool {
        match self {
            Pathway::Ring(r) => r.is_on(point),
            Pathway::Passage(p) => p.is_on(point),
        }
    }

    fn length(&self) -> f64 {
        match self {
            Pathway::Ring(r) => r.length(),
            Pathway::Passage(p) => p.length(),
        }
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pathway::Ring(r) => fmt::Display::fmt(r, f),
            Pathway::Passage(p) => fmt::Display::fmt(p, f),
        }
    }
}

// ── PathwayId ─────────────────────────────────────────────────────────────────

/// Handle naming a pathway inside one map revision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathwayId {
    Ring(RingId),
    Passage(PassageId),
}

impl PathwayId {
    #[inline]
    pub fn is_ring(self) -> bool {
        matches!(self, PathwayId::Ring(_))
    }
}

impl fmt::Display for PathwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathwayId::Ring(id) => fmt::Display::fmt(id, f),
            PathwayId::Passage(id) => fmt::Display::fmt(id, f),
        }
    }
}
