//! Navigation-graph error type.

use thiserror::Error;

use rn_core::NodeId;
use rn_map::PathwayId;

/// Errors produced by `rn-graph`.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("an edge between {a} and {b} already exists")]
    DuplicateEdge { a: NodeId, b: NodeId },

    #[error("refusing to connect {0} to itself")]
    SelfLoop(NodeId),

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("{node} cannot be removed: it has {degree} edge(s) or joins two pathways")]
    NotRemovable { node: NodeId, degree: usize },

    #[error("pathway {0} does not exist in the map")]
    UnknownPathway(PathwayId),

    #[error("pathway {0} has too few nodes to split")]
    TooFewNodes(PathwayId),
}

pub type GraphResult<T> = Result<T, GraphError>;
