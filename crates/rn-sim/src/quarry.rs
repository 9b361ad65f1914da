//! The position pursuers chase, or flee from.

use rn_core::{RingId, Vec2};
use rn_map::CircularMap;

use crate::{SimError, SimResult};

/// Where the quarry is and how it moves between ticks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Quarry {
    /// Stays at one point.
    Fixed(Vec2),
    /// Circles `ring` at a constant angular speed.  Positive speeds turn
    /// counter-clockwise.
    Orbit {
        ring:             RingId,
        bearing:          f64,
        degrees_per_tick: f64,
    },
}

impl Quarry {
    /// Check the quarry against `map`.
    pub(crate) fn validate(&self, map: &CircularMap) -> SimResult<()> {
        match *self {
            Quarry::Fixed(position) if map.is_cheating(position) => Err(SimError::Config(
                format!("quarry position {position} is off the map"),
            )),
            Quarry::Orbit { ring, .. } if map.ring(ring).is_none() => Err(SimError::Config(
                format!("quarry orbits unknown ring {ring}"),
            )),
            Quarry::Orbit { degrees_per_tick, .. } if !degrees_per_tick.is_finite() => Err(
                SimError::Config("quarry angular speed must be finite".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Current position on `map`.
    pub fn position(&self, map: &CircularMap) -> Vec2 {
        match *self {
            Quarry::Fixed(position) => position,
            Quarry::Orbit { ring, bearing, .. } => match map.ring(ring) {
                Some(r) => r.point_at(bearing),
                None => map.center(),
            },
        }
    }

    /// Move one tick forward.
    pub fn advance(&mut self) {
        if let Quarry::Orbit { bearing, degrees_per_tick, .. } = self {
            *bearing = (*bearing + *degrees_per_tick).rem_euclid(360.0);
        }
    }
}
