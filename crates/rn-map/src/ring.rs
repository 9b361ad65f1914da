//! Circular lanes.

use std::fmt;

use rand::Rng;

use rn_core::{approx_eq, Vec2, EPSILON};

use crate::pathway::PathwayGeometry;
use crate::{MapError, MapResult};

/// Sense of travel around a ring's center.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// A circle of walkable positions around a shared map center.
///
/// Immutable once built.  Equality compares center and radius within
/// [`EPSILON`].
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ring {
    radius: f64,
    center: Vec2,
}

impl Ring {
    pub fn new(radius: f64, center: Vec2) -> MapResult<Self> {
        if !(radius > 0.0) {
            return Err(MapError::InvalidRadius(radius));
        }
        Ok(Self { radius, center })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn circumference(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.radius
    }

    /// Point on the ring at `bearing` degrees from the positive x axis.
    pub fn point_at(&self, bearing: f64) -> Vec2 {
        self.center + Vec2::from_bearing(bearing) * self.radius
    }

    /// Bearing of `point` as seen from the center, in `[0, 360)`.
    #[inline]
    pub fn bearing_of(&self, point: Vec2) -> f64 {
        (point - self.center).bearing()
    }

    /// Arc length swept counter-clockwise from `from` to `to`.
    pub fn ccw_arc(&self, from: Vec2, to: Vec2) -> f64 {
        let sweep = (from - self.center).ccw_angle_to(to - self.center);
        sweep.to_radians() * self.radius
    }

    /// Unit tangent at `position` for travel in `rotation`.
    pub fn tangent(&self, position: Vec2, rotation: Rotation) -> Vec2 {
        let ccw = (position - self.center).perp().normalized();
        match rotation {
            Rotation::CounterClockwise => ccw,
            Rotation::Clockwise => -ccw,
        }
    }

    /// Rotation that reaches `target` from `position` through the smaller
    /// angle.  A target exactly opposite resolves counter-clockwise.
    pub fn rotation_towards(&self, position: Vec2, target: Vec2) -> Rotation {
        if (position - self.center).signed_angle_to(target - self.center) < 0.0 {
            Rotation::Clockwise
        } else {
            Rotation::CounterClockwise
        }
    }
}

impl PathwayGeometry for Ring {
    fn closest_to(&self, target: Vec2) -> Vec2 {
        self.point_at(self.bearing_of(target))
    }

    fn distance_from_path(&self, target: Vec2) -> f64 {
        (target.distance(self.center) - self.radius).abs()
    }

    fn distance_between(&self, a: Vec2, b: Vec2, force_detour: bool) -> f64 {
        let angle = (a - self.center).angle_to(b - self.center);
        let angle = if force_detour { 360.0 - angle } else { angle };
        (std::f64::consts::PI * angle * self.radius / 180.0).abs()
    }

    fn orientate(&self, position: Vec2, target: Vec2) -> Vec2 {
        self.tangent(position, self.rotation_towards(position, target))
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        self.point_at(rng.gen_range(0.0..360.0))
    }

    fn is_on(&self, point: Vec2) -> bool {
        (point.distance(self.center) - self.radius).abs() <= EPSILON
    }

    fn length(&self) -> f64 {
        self.circumference()
    }
}

impl PartialEq for Ring {
    fn eq(&self, other: &Self) -> bool {
        self.center.same_as(other.center) && approx_eq(self.radius, other.radius)
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ring [center = {}, radius = {:.2}]", self.center, self.radius)
    }
}
