//! `CircularMap`: the authored topology.
//!
//! # Authoring
//!
//! 1. Create the map with its center ([`CircularMap::new`]).
//! 2. Add rings with [`add_ring`](CircularMap::add_ring) or
//!    [`add_ring_through`](CircularMap::add_ring_through).  Rings are kept
//!    sorted by radius, so a [`RingId`] is the ring's rank at that revision.
//! 3. Add passageways with [`add_passage`](CircularMap::add_passage) (attaches
//!    to the two closest rings) or
//!    [`add_passage_between`](CircularMap::add_passage_between).
//! 4. Call [`validate`](CircularMap::validate): every ring needs at least two
//!    passage attachments to be reachable from the rest of the graph.
//!
//! Every successful mutation bumps [`revision`](CircularMap::revision), so a
//! navigation graph built earlier can detect that it is stale.

use std::fmt;

use rand::Rng;

use rn_core::{PassageId, RingId, Vec2};

use crate::passage::Passageway;
use crate::pathway::{Pathway, PathwayGeometry, PathwayId};
use crate::ring::Ring;
use crate::{MapError, MapResult};

/// Default distance from the map beyond which a position counts as cheating.
pub const CHEAT_THRESHOLD: f64 = 0.37;

/// Default wiggle room between lanes, in map units.
pub const MARGIN: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct CircularMap {
    center:          Vec2,
    rings:           Vec<Ring>,
    passages:        Vec<Passageway>,
    cheat_threshold: f64,
    margin:          f64,
    revision:        u64,
}

impl CircularMap {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            rings:           Vec::new(),
            passages:        Vec::new(),
            cheat_threshold: CHEAT_THRESHOLD,
            margin:          MARGIN,
            revision:        0,
        }
    }

    /// `count` rings with radii `2·margin·(i + 1)` and no passageways.
    pub fn evenly_spaced(center: Vec2, count: usize) -> MapResult<Self> {
        if count == 0 {
            return Err(MapError::EmptyMap);
        }
        let mut map = Self::new(center);
        for i in 0..count {
            map.add_ring(2.0 * (i + 1) as f64 * map.margin)?;
        }
        Ok(map)
    }

    pub fn with_cheat_threshold(mut self, threshold: f64) -> Self {
        self.cheat_threshold = threshold;
        self
    }

    // ── Authoring ─────────────────────────────────────────────────────────

    /// Add a ring of `radius`.  Adding a ring equal to an existing one
    /// returns the existing ring's id and leaves the map unchanged.
    pub fn add_ring(&mut self, radius: f64) -> MapResult<RingId> {
        let ring = Ring::new(radius, self.center)?;
        if let Some(existing) = self.ring_id_of(&ring) {
            tracing::debug!(%ring, "ring already present");
            return Ok(existing);
        }
        let rank = self.rings.partition_point(|r| r.radius() < radius);
        self.rings.insert(rank, ring);
        self.revision += 1;
        ring_id(rank)
    }

    /// Add the ring passing through `point`.
    pub fn add_ring_through(&mut self, point: Vec2) -> MapResult<RingId> {
        self.add_ring(point.distance(self.center))
    }

    /// Add a passageway through `point`, attached to the two rings closest to
    /// it.  Fails if the map has fewer than two rings or if `point` lies on a
    /// ring.
    pub fn add_passage(&mut self, point: Vec2) -> MapResult<PassageId> {
        if self.rings.len() < 2 {
            return Err(MapError::NotEnoughRings { found: self.rings.len() });
        }
        if self.rings.iter().any(|r| r.is_on(point)) {
            return Err(MapError::InvalidPassageway(format!(
                "point {point} is too close to a ring; place it between two rings"
            )));
        }
        let (a, b) = self.closest_rings(point);
        self.insert_passage(Passageway::new(a, b, point)?)
    }

    /// Add a passageway between the rings ranked `first` and `second`, at the
    /// bearing of `point`.
    pub fn add_passage_between(&mut self, first: usize, second: usize, point: Vec2) -> MapResult<PassageId> {
        let a = *self.rings.get(first).ok_or(MapError::RingNotFound(first))?;
        let b = *self.rings.get(second).ok_or(MapError::RingNotFound(second))?;
        self.insert_passage(Passageway::new(a, b, point)?)
    }

    /// Add a passageway leaving ring `ring_index` outward along `direction`.
    ///
    /// The bearing point sits at `margin + 2·margin·(ring_index + 1)` from the
    /// center, which lands between consecutive evenly spaced rings.
    pub fn add_radial_passage(&mut self, ring_index: usize, direction: Vec2) -> MapResult<PassageId> {
        if ring_index >= self.rings.len() {
            return Err(MapError::RingNotFound(ring_index));
        }
        let unit = direction.normalized();
        if unit == Vec2::ZERO {
            return Err(MapError::InvalidPassageway("direction has no bearing".into()));
        }
        let reach = self.margin + 2.0 * self.margin * (ring_index + 1) as f64;
        self.add_passage(self.center + unit * reach)
    }

    fn insert_passage(&mut self, passage: Passageway) -> MapResult<PassageId> {
        if let Some(i) = self.passages.iter().position(|p| *p == passage) {
            tracing::debug!(%passage, "passageway already present");
            return passage_id(i);
        }
        self.passages.push(passage);
        self.revision += 1;
        passage_id(self.passages.len() - 1)
    }

    /// The two rings nearest `point`, by distance from path.  With exactly
    /// two rings both are returned regardless of distance.
    fn closest_rings(&self, point: Vec2) -> (Ring, Ring) {
        if let [a, b] = self.rings.as_slice() {
            return (*a, *b);
        }
        let mut sorted = self.rings.clone();
        sorted.sort_by(|a, b| {
            a.distance_from_path(point).total_cmp(&b.distance_from_path(point))
        });
        (sorted[0], sorted[1])
    }

    /// Check the routing invariants: each passageway's rings belong to the
    /// map and each ring carries at least two attachments.
    pub fn validate(&self) -> MapResult<()> {
        if self.rings.is_empty() {
            return Err(MapError::EmptyMap);
        }
        for p in &self.passages {
            if self.ring_id_of(&p.small_ring()).is_none() || self.ring_id_of(&p.large_ring()).is_none() {
                return Err(MapError::ForeignRing);
            }
        }
        for (i, ring) in self.rings.iter().enumerate() {
            let attachments = self.passage_points_on_ring(ring).len();
            if attachments < 2 {
                return Err(MapError::UnderConnectedRing { ring: ring_id(i)?, attachments });
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Closest pathway and point on it, scanning rings then passageways and
    /// keeping the first strict minimum.
    fn closest(&self, target: Vec2) -> Option<(PathwayId, Vec2)> {
        let mut best: Option<(PathwayId, Vec2)> = None;
        let mut best_distance = f64::MAX;
        for (id, pathway) in self.pathways() {
            let d = pathway.distance_from_path(target);
            if d < best_distance {
                best_distance = d;
                best = Some((id, pathway.closest_to(target)));
            }
        }
        best
    }

    /// Point of the map closest to `target`; `None` on an empty map.
    pub fn closest_point(&self, target: Vec2) -> Option<Vec2> {
        self.closest(target).map(|(_, p)| p)
    }

    /// Pathway closest to `target`; `None` on an empty map.
    pub fn closest_pathway(&self, target: Vec2) -> Option<PathwayId> {
        self.closest(target).map(|(id, _)| id)
    }

    /// `true` when `position` is farther than the cheat threshold from every
    /// pathway.  Any position is off-map on an empty map.
    pub fn is_cheating(&self, position: Vec2) -> bool {
        match self.closest_point(position) {
            Some(p) => p.distance(position) > self.cheat_threshold,
            None => true,
        }
    }

    /// A point drawn uniformly over the total walkable length: a pathway is
    /// picked with probability proportional to its length (passageways
    /// first, then rings), then a point uniformly on it.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec2> {
        let weighted: Vec<Pathway> = self
            .passages
            .iter()
            .map(|p| Pathway::Passage(*p))
            .chain(self.rings.iter().map(|r| Pathway::Ring(*r)))
            .collect();
        let total: f64 = weighted.iter().map(|p| p.length()).sum();
        if !(total > 0.0) {
            return None;
        }

        let pick = rng.gen_range(0.0..total);
        let mut end = 0.0;
        for pathway in &weighted {
            end += pathway.length();
            if end >= pick {
                return Some(pathway.random_point(rng));
            }
        }
        weighted.last().map(|p| p.random_point(rng))
    }

    /// Distinct passageway endpoints lying on `ring`.
    pub fn passage_points_on_ring(&self, ring: &Ring) -> Vec<Vec2> {
        let mut points: Vec<Vec2> = Vec::new();
        for p in &self.passages {
            if let Some(point) = p.point_on(ring) {
                if !points.iter().any(|q| q.same_as(point)) {
                    points.push(point);
                }
            }
        }
        points
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    #[inline]
    pub fn cheat_threshold(&self) -> f64 {
        self.cheat_threshold
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Rings in ascending radius order.
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn passages(&self) -> &[Passageway] {
        &self.passages
    }

    pub fn ring(&self, id: RingId) -> Option<&Ring> {
        self.rings.get(id.index())
    }

    pub fn passage(&self, id: PassageId) -> Option<&Passageway> {
        self.passages.get(id.index())
    }

    pub fn ring_id_of(&self, ring: &Ring) -> Option<RingId> {
        let i = self.rings.iter().position(|r| r == ring)?;
        RingId::try_from(i).ok()
    }

    pub fn pathway(&self, id: PathwayId) -> Option<Pathway> {
        match id {
            PathwayId::Ring(r) => self.ring(r).copied().map(Pathway::Ring),
            PathwayId::Passage(p) => self.passage(p).copied().map(Pathway::Passage),
        }
    }

    /// Every pathway, rings first then passageways.
    pub fn pathways(&self) -> impl Iterator<Item = (PathwayId, Pathway)> + '_ {
        let rings = self
            .rings
            .iter()
            .enumerate()
            .map(|(i, r)| (PathwayId::Ring(RingId(i as u16)), Pathway::Ring(*r)));
        let passages = self
            .passages
            .iter()
            .enumerate()
            .map(|(i, p)| (PathwayId::Passage(PassageId(i as u16)), Pathway::Passage(*p)));
        rings.chain(passages)
    }

    /// Total walkable length of the map.
    pub fn total_length(&self) -> f64 {
        self.pathways().map(|(_, p)| p.length()).sum()
    }
}

fn ring_id(i: usize) -> MapResult<RingId> {
    RingId::try_from(i).map_err(|_| MapError::RingNotFound(i))
}

fn passage_id(i: usize) -> MapResult<PassageId> {
    PassageId::try_from(i)
        .map_err(|_| MapError::InvalidPassageway(format!("too many passageways ({i})")))
}

impl fmt::Display for CircularMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CircularMap [center = {}]", self.center)?;
        for ring in &self.rings {
            writeln!(f, "  {ring}")?;
        }
        for passage in &self.passages {
            writeln!(f, "  {passage}")?;
        }
        Ok(())
    }
}
