//! Straight radial connectors between two rings.

use std::fmt;

use rand::Rng;

use rn_core::{Vec2, EPSILON};

use crate::pathway::PathwayGeometry;
use crate::ring::Ring;
use crate::{MapError, MapResult};

/// A radial segment joining the point at one bearing on the smaller ring to
/// the point at the same bearing on the larger ring.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passageway {
    small_ring:  Ring,
    large_ring:  Ring,
    small_point: Vec2,
    large_point: Vec2,
}

impl Passageway {
    /// Build the passageway between `ring_a` and `ring_b` whose bearing is
    /// that of `through` as seen from the rings' center.
    ///
    /// The argument order of the rings does not matter.  Fails when both
    /// arguments are the same ring, when the rings are not concentric, or
    /// when `through` lies on either ring or on the center (the bearing would
    /// be ambiguous).
    pub fn new(ring_a: Ring, ring_b: Ring, through: Vec2) -> MapResult<Self> {
        if ring_a == ring_b {
            return Err(MapError::InvalidPassageway("both ends on the same ring".into()));
        }
        if !ring_a.center().same_as(ring_b.center()) {
            return Err(MapError::InvalidPassageway("rings are not concentric".into()));
        }
        if ring_a.is_on(through) || ring_b.is_on(through) {
            return Err(MapError::InvalidPassageway(format!(
                "point {through} lies on a ring; place it between the rings"
            )));
        }
        if through.same_as(ring_a.center()) {
            return Err(MapError::InvalidPassageway(format!(
                "point {through} is the center and has no bearing"
            )));
        }

        let (small_ring, large_ring) = if ring_a.radius() < ring_b.radius() {
            (ring_a, ring_b)
        } else {
            (ring_b, ring_a)
        };
        let bearing = small_ring.bearing_of(through);

        Ok(Self {
            small_ring,
            large_ring,
            small_point: small_ring.point_at(bearing),
            large_point: large_ring.point_at(bearing),
        })
    }

    #[inline]
    pub fn small_ring(&self) -> Ring {
        self.small_ring
    }

    #[inline]
    pub fn large_ring(&self) -> Ring {
        self.large_ring
    }

    #[inline]
    pub fn small_point(&self) -> Vec2 {
        self.small_point
    }

    #[inline]
    pub fn large_point(&self) -> Vec2 {
        self.large_point
    }

    /// Bearing shared by both endpoints.
    pub fn bearing(&self) -> f64 {
        self.small_ring.bearing_of(self.small_point)
    }

    /// The endpoint lying on `ring`, if the passageway touches it.
    pub fn point_on(&self, ring: &Ring) -> Option<Vec2> {
        if *ring == self.small_ring {
            Some(self.small_point)
        } else if *ring == self.large_ring {
            Some(self.large_point)
        } else {
            None
        }
    }

    /// Parameter of the projection of `point` along the segment, in map
    /// units from the small endpoint (unclamped).
    pub fn offset_of(&self, point: Vec2) -> f64 {
        (point - self.small_point).dot(self.axis())
    }

    #[inline]
    fn axis(&self) -> Vec2 {
        (self.large_point - self.small_point).normalized()
    }
}

impl PathwayGeometry for Passageway {
    fn closest_to(&self, target: Vec2) -> Vec2 {
        let t = self.offset_of(target).clamp(0.0, self.length());
        self.small_point + self.axis() * t
    }

    fn distance_from_path(&self, target: Vec2) -> f64 {
        target.distance(self.closest_to(target))
    }

    fn distance_between(&self, a: Vec2, b: Vec2, _force_detour: bool) -> f64 {
        self.closest_to(a).distance(self.closest_to(b))
    }

    fn orientate(&self, position: Vec2, target: Vec2) -> Vec2 {
        let axis = self.axis();
        if (target - position).dot(axis) > 0.0 { axis } else { -axis }
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let u: f64 = rng.gen_range(0.0..1.0);
        self.small_point + (self.large_point - self.small_point) * u
    }

    fn is_on(&self, point: Vec2) -> bool {
        let detour = point.distance(self.small_point) + point.distance(self.large_point);
        (detour - self.length()).abs() < EPSILON
    }

    #[inline]
    fn length(&self) -> f64 {
        self.small_point.distance(self.large_point)
    }
}

impl PartialEq for Passageway {
    fn eq(&self, other: &Self) -> bool {
        self.small_ring == other.small_ring
            && self.large_ring == other.large_ring
            && self.small_point.same_as(other.small_point)
            && self.large_point.same_as(other.large_point)
    }
}

impl fmt::Display for Passageway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Passageway [{} -> {}, bearing {:.1}]",
            self.small_point,
            self.large_point,
            self.bearing()
        )
    }
}

