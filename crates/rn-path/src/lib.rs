//! `rn-path`: routing pursuers over a ring-and-passageway map.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`search`]     | `shortest_path`: uniform-cost search, `GraphPath`        |
//! | [`route`]      | `Route`, `Leg`: committed waypoints and their headings   |
//! | [`traffic`]    | `Peer`, `TrafficView`: what a pursuer sees of the others |
//! | [`pathfinder`] | `Pathfinder`, `PursuitState`                              |
//! | [`error`]      | `PathError`, `PathResult<T>`                              |
//!
//! # Typical tick
//!
//! ```text
//! pf.set_obstacles(other_positions);
//! pf.set_target(pos, target, fleeing);
//! let heading = pf.orientation(pos, fleeing, &peers);
//! ```

pub mod error;
pub mod pathfinder;
pub mod route;
pub mod search;
pub mod traffic;


pub use error::{PathError, PathResult};
pub use pathfinder::{Pathfinder, PursuitState};
pub use route::{Leg, Route};
pub use search::{shortest_path, GraphPath};
pub use traffic::{EmptyRoad, Peer, TrafficView};
