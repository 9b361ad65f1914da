//! Static graph construction from a map.
//!
//! # Layout
//!
//! - One node per passageway endpoint.  Endpoints within the merge distance
//!   of an existing node are merged into it.
//! - One edge per passageway, weighted by its length.
//! - On each ring, the attachment nodes sorted by bearing are chained
//!   counter-clockwise, the last wrapping back to the first, each edge
//!   weighted by its arc length.
//!
//! A ring with fewer than three distinct attachments would need two parallel
//! edges (or a self-loop) to stay walkable in both directions, so it receives
//! [`NodeKind::Anchor`] nodes: one at the middle of the longer arc when it has
//! two attachments, two at +120° and +240° when it has one.

use rn_core::{NodeId, PassageId, RingId, EPSILON};
use rn_map::{CircularMap, PathwayGeometry, PathwayId, Ring};

use crate::graph::{NavGraph, NodeKind};
use crate::GraphResult;

impl NavGraph {
    /// Build the static graph of `map`.
    pub fn build(map: &CircularMap, merge_distance: f64) -> GraphResult<Self> {
        let mut graph = NavGraph::new(merge_distance);
        graph.rebuild_static_graph(map)?;
        Ok(graph)
    }

    /// Discard every node and edge, then rebuild from `map`.
    pub fn rebuild_static_graph(&mut self, map: &CircularMap) -> GraphResult<()> {
        self.clear();

        // ── Passageways ───────────────────────────────────────────────────
        for (i, passage) in map.passages().iter().enumerate() {
            let id = PathwayId::Passage(PassageId(i as u16));
            let small = self.add_node(passage.small_point(), NodeKind::Junction, false);
            let large = self.add_node(passage.large_point(), NodeKind::Junction, false);
            self.connect(small, large, passage.length(), id)?;

            for fresh in [small, large] {
                let position = self.node_or_err(fresh)?.position;
                if let Some(existing) = self.find_other_node_near(position, fresh) {
                    self.merge(existing, fresh)?;
                }
            }
        }

        // ── Rings ─────────────────────────────────────────────────────────
        for (i, ring) in map.rings().iter().enumerate() {
            let id = PathwayId::Ring(RingId(i as u16));
            let mut attached: Vec<NodeId> = Vec::new();
            for point in map.passage_points_on_ring(ring) {
                if let Some(n) = self.find_node_near(point) {
                    if !attached.contains(&n) {
                        attached.push(n);
                    }
                }
            }
            if attached.is_empty() {
                tracing::warn!(%ring, "ring has no passage attachments and is unreachable");
                continue;
            }
            self.add_anchors(ring, &mut attached);
            self.chain_ring(ring, id, attached)?;
        }

        self.map_revision = map.revision();
        tracing::debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            revision = self.map_revision,
            "static graph rebuilt"
        );
        Ok(())
    }

    /// Rebuild if `map` changed since the last build.  Returns `true` when a
    /// rebuild happened.
    pub fn ensure_current(&mut self, map: &CircularMap) -> GraphResult<bool> {
        if !self.is_stale(map) {
            return Ok(false);
        }
        self.rebuild_static_graph(map)?;
        Ok(true)
    }

    fn add_anchors(&mut self, ring: &Ring, attached: &mut Vec<NodeId>) {
        let bearings: Vec<f64> = attached
            .iter()
            .filter_map(|&n| self.node(n).map(|node| ring.bearing_of(node.position)))
            .collect();
        let anchor_bearings: Vec<f64> = match bearings.as_slice() {
            [only] => vec![only + 120.0, only + 240.0],
            [first, second] => {
                let (low, high) = if first <= second { (*first, *second) } else { (*second, *first) };
                let inner = high - low;
                let outer = 360.0 - inner;
                // Middle of the longer arc; the low → high arc wins ties.
                if inner + EPSILON >= outer {
                    vec![low + inner / 2.0]
                } else {
                    vec![high + outer / 2.0]
                }
            }
            _ => Vec::new(),
        };
        for bearing in anchor_bearings {
            let anchor = self.add_node(ring.point_at(bearing), NodeKind::Anchor, false);
            attached.push(anchor);
        }
    }

    fn chain_ring(&mut self, ring: &Ring, id: PathwayId, attached: Vec<NodeId>) -> GraphResult<()> {
        let mut placed: Vec<(f64, NodeId)> = Vec::with_capacity(attached.len());
        for n in attached {
            placed.push((ring.bearing_of(self.node_or_err(n)?.position), n));
        }
        placed.sort_by(|x, y| x.0.total_cmp(&y.0));

        let count = placed.len();
        for k in 0..count {
            let (_, from) = placed[k];
            let (_, to) = placed[(k + 1) % count];
            let length = ring.ccw_arc(self.node_or_err(from)?.position, self.node_or_err(to)?.position);
            self.connect(from, to, length, id)?;
        }
        Ok(())
    }
}
