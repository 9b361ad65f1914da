//! `rn-graph`: the dynamic navigation graph.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`graph`]  | `NavGraph` arena + R-tree, `Node`, `Edge`, `EdgeKey`         |
//! | [`build`]  | `NavGraph::build`, `rebuild_static_graph`, sparse-ring anchors |
//! | [`splice`] | `insert_node`, `remove_node`, `merge`, `Insertion`           |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                               |
//!
//! # Lifecycle
//!
//! ```text
//! build(map)            junction + anchor nodes, passage and ring-arc edges
//!   insert_node(..)     split an edge through a transient node
//!   …search…
//!   remove_node(..)     join the two halves back into the original edge
//! ```
//!
//! After every transient node is removed the edge set is equivalent to the
//! static one: same endpoints, same pathways, lengths equal within rounding.

pub mod build;
pub mod error;
pub mod graph;
pub mod splice;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{Edge, EdgeKey, NavGraph, Node, NodeKind};
pub use splice::{InsertStatus, Insertion};
