//! Pathfinding error type.

use thiserror::Error;

use rn_core::CoreError;
use rn_graph::GraphError;
use rn_map::MapError;

/// Errors produced by `rn-path`.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("map has no pathways to route on")]
    EmptyMap,

    #[error("no flee target at the minimum route distance after {attempts} samples")]
    NoFleeTarget { attempts: u32 },

    #[error("routing policy rejected: {0}")]
    Core(#[from] CoreError),

    #[error("map error: {0}")]
    Map(#[from] MapError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type PathResult<T> = Result<T, PathError>;
