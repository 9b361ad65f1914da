//! Reference map layouts.

use rn_core::Vec2;

use crate::map::CircularMap;
use crate::MapResult;

/// Center of the arena layout.
pub const ARENA_CENTER: Vec2 = Vec2::new(7.18, -5.16);

/// Ring radii of the arena layout, innermost first.
pub const ARENA_RADII: [f64; 4] = [0.7, 2.1, 3.5, 5.0];

/// `(inner ring, outer ring, bearing in degrees)` of each arena passageway.
pub const ARENA_PASSAGES: [(usize, usize, f64); 5] = [
    (0, 1, 60.0),
    (0, 1, 240.0),
    (1, 2, 0.0),
    (2, 3, 135.0),
    (2, 3, 315.0),
];

/// Four concentric rings around `(7.18, -5.16)` joined by five radial
/// passageways.  Every ring carries at least two attachments.
pub fn arena() -> MapResult<CircularMap> {
    let mut map = CircularMap::new(ARENA_CENTER);
    for radius in ARENA_RADII {
        map.add_ring(radius)?;
    }
    for (inner, outer, bearing) in ARENA_PASSAGES {
        let mid = (ARENA_RADII[inner] + ARENA_RADII[outer]) / 2.0;
        map.add_passage_between(inner, outer, ARENA_CENTER + Vec2::from_bearing(bearing) * mid)?;
    }
    map.validate()?;
    Ok(map)
}
