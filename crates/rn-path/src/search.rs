//! Uniform-cost search over a [`NavGraph`].
//!
//! # Blocking
//!
//! A blocking node is never entered: it is skipped as a neighbour, not given
//! a higher cost.  The source itself may be blocking (a pursuer's own node
//! blocks other pursuers, not itself).
//!
//! # Frontier
//!
//! The frontier is a [`PriorityList`] of `(cost, node)` pairs ordered by
//! cost.  On a strict improvement the node's old entry is dropped before the
//! new one goes in, so every node appears at most once.

use rustc_hash::FxHashMap;

use rn_core::{EdgeId, NodeId, PriorityList};
use rn_graph::NavGraph;

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    /// Visited nodes from source to destination, both included.
    pub nodes: Vec<NodeId>,
    /// Edges between consecutive nodes; one fewer than `nodes`.
    pub edges: Vec<EdgeId>,
    /// Sum of edge lengths.
    pub cost: f64,
}

impl GraphPath {
    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Shortest path from `from` to `to`, or `None` if `to` cannot be reached
/// without entering a blocking node.
pub fn shortest_path(graph: &NavGraph, from: NodeId, to: NodeId) -> Option<GraphPath> {
    if from == to {
        return Some(GraphPath { nodes: vec![from], edges: Vec::new(), cost: 0.0 });
    }

    let mut cost_so_far: FxHashMap<NodeId, f64> = FxHashMap::default();
    // came_from[v] = edge that reached v
    let mut came_from: FxHashMap<NodeId, EdgeId> = FxHashMap::default();
    let mut frontier = PriorityList::new(|entry: &(f64, NodeId)| entry.0);

    cost_so_far.insert(from, 0.0);
    frontier.push((0.0, from));

    while let Ok((cost, node)) = frontier.dequeue() {
        if node == to {
            return Some(reconstruct(graph, &came_from, from, to, cost));
        }

        for (edge_id, edge) in graph.edges_of(node) {
            let neighbor = edge.other(node);
            if graph.node(neighbor).is_none_or(|n| n.is_blocking) {
                continue;
            }
            let new_cost = cost + edge.length;
            let improves = cost_so_far.get(&neighbor).is_none_or(|&known| new_cost < known);
            if improves {
                cost_so_far.insert(neighbor, new_cost);
                came_from.insert(neighbor, edge_id);
                frontier.remove_where(|&(_, n)| n == neighbor);
                frontier.push((new_cost, neighbor));
            }
        }
    }

    None
}

fn reconstruct(
    graph: &NavGraph,
    came_from: &FxHashMap<NodeId, EdgeId>,
    from: NodeId,
    to: NodeId,
    cost: f64,
) -> GraphPath {
    let mut nodes = vec![to];
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let Some((&e, edge)) = came_from.get(&cur).and_then(|e| graph.edge(*e).map(|edge| (e, edge))) else {
            break;
        };
        edges.push(e);
        cur = edge.other(cur);
        nodes.push(cur);
    }
    nodes.reverse();
    edges.reverse();
    GraphPath { nodes, edges, cost }
}
