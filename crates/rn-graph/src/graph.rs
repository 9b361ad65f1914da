//! Node/edge arena and spatial index.
//!
//! # Data layout
//!
//! Nodes and edges live in slot vectors indexed by `NodeId` / `EdgeId`.  A
//! removed slot becomes `None` and its id goes on a free list, so ids of the
//! nodes that stay (the junctions) never change while transient nodes come
//! and go.  Undirected adjacency is an `FxHashMap<NodeId, Vec<EdgeId>>`.
//!
//! Ring edges are oriented: the arc of an edge on a ring runs
//! **counter-clockwise from `a` to `b`**.  Passageway edges carry no
//! orientation.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds every live node's position so the
//! merge-tolerance lookup is a nearest-neighbour query.

use std::fmt::Write as _;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use rn_core::{EdgeId, NodeId, Vec2};
use rn_map::{CircularMap, PathwayGeometry, PathwayId};

use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Node / Edge ───────────────────────────────────────────────────────────────

/// Why a node exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Passageway endpoint on a ring.
    Junction,
    /// Extra static node keeping a sparsely attached ring free of parallel
    /// edges.
    Anchor,
    /// Inserted for one query (start, target or obstacle).
    Transient,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub position:    Vec2,
    pub is_blocking: bool,
    pub kind:        NodeKind,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub a:       NodeId,
    pub b:       NodeId,
    pub length:  f64,
    pub pathway: PathwayId,
    pub cost:    f64,
}

impl Edge {
    /// The endpoint that is not `node`.
    #[inline]
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.a == node { self.b } else { self.a }
    }

    #[inline]
    pub fn joins(&self, x: NodeId, y: NodeId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// Order-independent description of one edge, for comparing edge sets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeKey {
    pub low:     NodeId,
    pub high:    NodeId,
    pub pathway: PathwayId,
    pub length:  f64,
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Mutable navigation graph derived from a [`CircularMap`].
///
/// Build with [`NavGraph::build`]; splice query nodes in and out with
/// [`insert_node`](NavGraph::insert_node) / [`remove_node`](NavGraph::remove_node).
#[derive(Clone)]
pub struct NavGraph {
    nodes:          Vec<Option<Node>>,
    edges:          Vec<Option<Edge>>,
    free_nodes:     Vec<NodeId>,
    free_edges:     Vec<EdgeId>,
    adjacency:      FxHashMap<NodeId, Vec<EdgeId>>,
    spatial_idx:    RTree<NodeEntry>,
    merge_distance: f64,
    pub(crate) map_revision: u64,
}

impl NavGraph {
    /// An empty graph whose lookups merge nodes closer than `merge_distance`.
    pub fn new(merge_distance: f64) -> Self {
        Self {
            nodes:          Vec::new(),
            edges:          Vec::new(),
            free_nodes:     Vec::new(),
            free_edges:     Vec::new(),
            adjacency:      FxHashMap::default(),
            spatial_idx:    RTree::new(),
            merge_distance,
            map_revision:   0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.free_nodes.clear();
        self.free_edges.clear();
        self.adjacency.clear();
        self.spatial_idx = RTree::new();
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    #[inline]
    pub fn merge_distance(&self) -> f64 {
        self.merge_distance
    }

    /// `true` if `map` changed since this graph was built from it.
    pub fn is_stale(&self, map: &CircularMap) -> bool {
        self.map_revision != map.revision()
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(|n| n.as_ref())
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(|e| e.as_ref())
    }

    pub(crate) fn node_or_err(&self, id: NodeId) -> GraphResult<&Node> {
        self.node(id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Live nodes with their ids.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Live edges with their ids.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeId(i as u32), e)))
    }

    /// Edges incident to `node`.
    pub fn edges_of(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(move |&e| self.edge(e).map(|edge| (e, edge)))
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, |v| v.len())
    }

    /// The edge joining `x` and `y`, in either orientation.
    pub fn edge_between(&self, x: NodeId, y: NodeId) -> Option<EdgeId> {
        self.edges_of(x).find(|(_, e)| e.joins(x, y)).map(|(id, _)| id)
    }

    /// Nodes touched by at least one edge of `pathway`.
    pub fn nodes_on(&self, pathway: PathwayId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        for (_, e) in self.edges().filter(|(_, e)| e.pathway == pathway) {
            for n in [e.a, e.b] {
                if !out.contains(&n) {
                    out.push(n);
                }
            }
        }
        out
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node strictly closer than the merge distance to `position`.
    pub fn find_node_near(&self, position: Vec2) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&position.to_array())
            .filter(|e| e.distance_2(&position.to_array()) < self.merge_distance * self.merge_distance)
            .map(|e| e.id)
    }

    /// Like [`find_node_near`](Self::find_node_near) but ignoring `except`.
    pub(crate) fn find_other_node_near(&self, position: Vec2, except: NodeId) -> Option<NodeId> {
        let limit = self.merge_distance * self.merge_distance;
        self.spatial_idx
            .nearest_neighbor_iter(&position.to_array())
            .filter(|e| e.id != except)
            .take_while(|e| e.distance_2(&position.to_array()) < limit)
            .map(|e| e.id)
            .next()
    }

    // ── Mutation primitives ───────────────────────────────────────────────

    pub(crate) fn add_node(&mut self, position: Vec2, kind: NodeKind, is_blocking: bool) -> NodeId {
        let node = Node { position, is_blocking, kind };
        let id = match self.free_nodes.pop() {
            Some(id) => {
                self.nodes[id.index()] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId((self.nodes.len() - 1) as u32)
            }
        };
        self.spatial_idx.insert(NodeEntry { point: position.to_array(), id });
        id
    }

    /// Delete `id` and every edge touching it.
    pub(crate) fn delete_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let node = self
            .nodes
            .get_mut(id.index())
            .and_then(|slot| slot.take())
            .ok_or(GraphError::NodeNotFound(id))?;
        let incident: Vec<EdgeId> = self.adjacency.get(&id).cloned().unwrap_or_default();
        for e in incident {
            self.delete_edge(e);
        }
        self.adjacency.remove(&id);
        self.spatial_idx.remove(&NodeEntry { point: node.position.to_array(), id });
        self.free_nodes.push(id);
        Ok(node)
    }

    /// Join `a` and `b` with a new edge on `pathway`.
    ///
    /// For ring pathways the arc must run counter-clockwise from `a` to `b`.
    pub fn connect(&mut self, a: NodeId, b: NodeId, length: f64, pathway: PathwayId) -> GraphResult<EdgeId> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        self.node_or_err(a)?;
        self.node_or_err(b)?;
        if self.edge_between(a, b).is_some() {
            return Err(GraphError::DuplicateEdge { a, b });
        }

        let edge = Edge { a, b, length, pathway, cost: 1.0 };
        let id = match self.free_edges.pop() {
            Some(id) => {
                self.edges[id.index()] = Some(edge);
                id
            }
            None => {
                self.edges.push(Some(edge));
                EdgeId((self.edges.len() - 1) as u32)
            }
        };
        self.adjacency.entry(a).or_default().push(id);
        self.adjacency.entry(b).or_default().push(id);
        Ok(id)
    }

    pub(crate) fn delete_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.index()).and_then(|slot| slot.take())?;
        for n in [edge.a, edge.b] {
            if let Some(list) = self.adjacency.get_mut(&n) {
                list.retain(|&e| e != id);
            }
        }
        self.free_edges.push(id);
        Some(edge)
    }

    /// Set the blocking flag of `node`, returning the previous value.
    pub fn set_blocking(&mut self, node: NodeId, is_blocking: bool) -> GraphResult<bool> {
        let slot = self
            .nodes
            .get_mut(node.index())
            .and_then(|n| n.as_mut())
            .ok_or(GraphError::NodeNotFound(node))?;
        Ok(std::mem::replace(&mut slot.is_blocking, is_blocking))
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// The live edge set in an id-independent, sorted form.
    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        let mut keys: Vec<EdgeKey> = self
            .edges()
            .map(|(_, e)| EdgeKey {
                low:     e.a.min(e.b),
                high:    e.a.max(e.b),
                pathway: e.pathway,
                length:  e.length,
            })
            .collect();
        keys.sort_by_key(|k| (k.low, k.high, k.pathway));
        keys
    }

    /// Human-readable listing of nodes grouped by the ring they lie on.
    pub fn describe(&self, map: &CircularMap) -> String {
        let mut out = String::new();
        let mut listed: Vec<NodeId> = Vec::new();
        for ring in map.rings() {
            let _ = writeln!(out, "ring r={:.2}:", ring.radius());
            let mut on_ring: Vec<(f64, NodeId, &Node)> = self
                .nodes()
                .filter(|(_, n)| ring.is_on(n.position))
                .map(|(id, n)| (ring.bearing_of(n.position), id, n))
                .collect();
            on_ring.sort_by(|x, y| x.0.total_cmp(&y.0));
            for (bearing, id, node) in on_ring {
                let _ = writeln!(
                    out,
                    "  {id} @ {bearing:6.1}° {:?}{} degree {}",
                    node.kind,
                    if node.is_blocking { " blocking" } else { "" },
                    self.degree(id)
                );
                listed.push(id);
            }
        }
        for (id, node) in self.nodes().filter(|(id, _)| !listed.contains(id)) {
            let _ = writeln!(out, "off-ring {id} at {} {:?}", node.position, node.kind);
        }
        out
    }
}

impl std::fmt::Debug for NavGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("merge_distance", &self.merge_distance)
            .field("map_revision", &self.map_revision)
            .finish()
    }
}
