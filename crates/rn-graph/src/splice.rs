//! Splicing query nodes into and out of the graph.

use rn_core::{NodeId, Vec2};
use rn_map::{CircularMap, Pathway, PathwayGeometry, PathwayId};

use crate::graph::{NavGraph, NodeKind};
use crate::{GraphError, GraphResult};

/// Whether an insertion had to repair the graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertStatus {
    /// The bounding edge existed and was split.
    Clean,
    /// The two bounding nodes were not connected; the missing edge was
    /// recreated around the new node.  Never happens on a correctly built
    /// graph.
    Recovered,
}

/// Outcome of [`NavGraph::insert_node`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Insertion {
    pub node:    NodeId,
    /// `false` when the position fell within the merge distance of an
    /// existing node, which is returned instead.
    pub created: bool,
    pub status:  InsertStatus,
}

impl NavGraph {
    /// Place a node for `position` on `pathway`.
    ///
    /// The position is first projected onto the pathway.  If an existing node
    /// lies within the merge distance of the projection, that node is
    /// returned unchanged.  Otherwise the edge between the two nodes bounding
    /// the projection (angularly on a ring, along the segment on a
    /// passageway) is split through a new transient node.
    pub fn insert_node(
        &mut self,
        map: &CircularMap,
        pathway: PathwayId,
        position: Vec2,
        is_blocking: bool,
    ) -> GraphResult<Insertion> {
        let geometry = map.pathway(pathway).ok_or(GraphError::UnknownPathway(pathway))?;
        let projected = geometry.closest_to(position);

        if let Some(existing) = self.find_node_near(projected) {
            return Ok(Insertion { node: existing, created: false, status: InsertStatus::Clean });
        }

        let (prev, next) = self.bounding_nodes(&geometry, pathway, projected)?;

        let status = match self.edge_between(prev, next) {
            Some(e) if self.edge(e).is_some_and(|edge| edge.pathway == pathway) => {
                self.delete_edge(e);
                InsertStatus::Clean
            }
            _ => {
                tracing::warn!(
                    %pathway,
                    %prev,
                    %next,
                    "bounding nodes were not connected; recreating the missing edge"
                );
                InsertStatus::Recovered
            }
        };

        let node = self.add_node(projected, NodeKind::Transient, is_blocking);
        let prev_pos = self.node_or_err(prev)?.position;
        let next_pos = self.node_or_err(next)?.position;
        self.connect(prev, node, piece_length(&geometry, prev_pos, projected), pathway)?;
        self.connect(node, next, piece_length(&geometry, projected, next_pos), pathway)?;

        Ok(Insertion { node, created: true, status })
    }

    /// The nodes on either side of `point` along `pathway`.
    ///
    /// On a ring, `prev` is the first node met going clockwise and `next`
    /// the first met going counter-clockwise, so the arc runs `prev → point
    /// → next` counter-clockwise.  On a passageway they are the nearest nodes
    /// toward the small and the large end.
    fn bounding_nodes(
        &self,
        geometry: &Pathway,
        pathway: PathwayId,
        point: Vec2,
    ) -> GraphResult<(NodeId, NodeId)> {
        let on_path = self.nodes_on(pathway);
        let mut prev: Option<(f64, NodeId)> = None;
        let mut next: Option<(f64, NodeId)> = None;

        match geometry {
            Pathway::Ring(ring) => {
                let from = point - ring.center();
                for n in on_path {
                    let sweep = from.ccw_angle_to(self.node_or_err(n)?.position - ring.center());
                    if next.is_none_or(|(best, _)| sweep < best) {
                        next = Some((sweep, n));
                    }
                    if prev.is_none_or(|(best, _)| sweep > best) {
                        prev = Some((sweep, n));
                    }
                }
            }
            Pathway::Passage(passage) => {
                let t = passage.offset_of(point);
                for n in on_path {
                    let tn = passage.offset_of(self.node_or_err(n)?.position);
                    if tn < t && prev.is_none_or(|(best, _)| tn > best) {
                        prev = Some((tn, n));
                    }
                    if tn > t && next.is_none_or(|(best, _)| tn < best) {
                        next = Some((tn, n));
                    }
                }
            }
        }

        match (prev, next) {
            (Some((_, p)), Some((_, n))) if p != n => Ok((p, n)),
            _ => Err(GraphError::TooFewNodes(pathway)),
        }
    }

    /// Remove a degree-2 node whose edges lie on the same pathway, joining
    /// its neighbours with one edge of the combined length.
    pub fn remove_node(&mut self, node: NodeId) -> GraphResult<()> {
        self.node_or_err(node)?;
        let incident: Vec<_> = self.edges_of(node).map(|(id, e)| (id, *e)).collect();
        let not_removable = GraphError::NotRemovable { node, degree: incident.len() };

        let [(_, first), (_, second)] = incident.as_slice() else {
            return Err(not_removable);
        };
        if first.pathway != second.pathway {
            return Err(not_removable);
        }

        // Keep ring orientation: the edge ending at `node` supplies the new
        // start, the edge leaving it supplies the new end.
        let (incoming, outgoing) = if first.b == node { (first, second) } else { (second, first) };
        let from = incoming.other(node);
        let to = outgoing.other(node);
        if from == to || self.edge_between(from, to).is_some() {
            return Err(not_removable);
        }

        let pathway = first.pathway;
        let length = first.length + second.length;
        self.delete_node(node)?;
        self.connect(from, to, length, pathway)?;
        Ok(())
    }

    /// Rewire every edge of `absorbed` onto `original`, then delete
    /// `absorbed`.  Edges that would become self-loops or duplicate an
    /// existing edge of `original` are dropped.
    pub fn merge(&mut self, original: NodeId, absorbed: NodeId) -> GraphResult<()> {
        self.node_or_err(original)?;
        self.node_or_err(absorbed)?;
        if original == absorbed {
            return Ok(());
        }

        let moved: Vec<_> = self.edges_of(absorbed).map(|(id, e)| (id, *e)).collect();
        for (id, edge) in moved {
            self.delete_edge(id);
            let other = edge.other(absorbed);
            if other == original || self.edge_between(original, other).is_some() {
                tracing::debug!(%original, %absorbed, %other, "dropping edge made redundant by merge");
                continue;
            }
            let (a, b) = if edge.a == absorbed { (original, other) } else { (other, original) };
            self.connect(a, b, edge.length, edge.pathway)?;
        }

        self.delete_node(absorbed)?;
        Ok(())
    }
}

/// Length of the piece of `geometry` between two of its points, in the
/// graph's edge orientation.
fn piece_length(geometry: &Pathway, from: Vec2, to: Vec2) -> f64 {
    match geometry {
        Pathway::Ring(ring) => ring.ccw_arc(from, to),
        Pathway::Passage(_) => geometry.distance_between(from, to, false),
    }
}
