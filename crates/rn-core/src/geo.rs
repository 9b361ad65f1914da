//! Planar vector type and angle utilities.
//!
//! Angles are in **degrees** throughout the public API.  Bearings are measured
//! counter-clockwise from the positive x axis and normalised to `[0, 360)`;
//! signed angles are in `[-180, 180]`, positive meaning counter-clockwise.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance used for floating-point equality of lengths and positions.
pub const EPSILON: f64 = 1e-4;

/// `true` if `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// A 2-D point or direction in map units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `bearing` degrees.
    #[inline]
    pub fn from_bearing(bearing: f64) -> Self {
        let rad = bearing.to_radians();
        Self::new(rad.cos(), rad.sin())
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3-D cross product.
    #[inline]
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotate by +90° (counter-clockwise).
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Unit vector in the same direction, or [`Vec2::ZERO`] for a degenerate
    /// (near-zero) vector.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len < 1e-12 {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    /// Bearing of this vector in `[0, 360)`.  The zero vector has bearing 0.
    pub fn bearing(self) -> f64 {
        let deg = self.y.atan2(self.x).to_degrees();
        if deg < 0.0 { deg + 360.0 } else { deg }
    }

    /// Signed angle from `self` to `other` in `[-180, 180]`.
    #[inline]
    pub fn signed_angle_to(self, other: Vec2) -> f64 {
        self.cross(other).atan2(self.dot(other)).to_degrees()
    }

    /// Unsigned angle between `self` and `other` in `[0, 180]`.
    #[inline]
    pub fn angle_to(self, other: Vec2) -> f64 {
        self.signed_angle_to(other).abs()
    }

    /// Counter-clockwise sweep from `self` to `other` in `[0, 360)`.
    pub fn ccw_angle_to(self, other: Vec2) -> f64 {
        let a = self.signed_angle_to(other);
        if a < 0.0 { a + 360.0 } else { a }
    }

    /// `true` if the two points are closer than [`EPSILON`].
    #[inline]
    pub fn same_as(self, other: Vec2) -> bool {
        self.distance(other) < EPSILON
    }

    /// `[x, y]` array form, used for spatial-index keys.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Vec2::new(x, y)
    }
}

impl From<Vec2> for (f64, f64) {
    #[inline]
    fn from(v: Vec2) -> Self {
        (v.x, v.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
