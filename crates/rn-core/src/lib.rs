//! `rn-core`: foundational types for the `ringnav` pursuit-routing framework.
//!
//! This crate is a dependency of every other `rn-*` crate.  It intentionally
//! has no `rn-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`, `RingId`, `PassageId`  |
//! | [`geo`]         | `Vec2`, bearings, signed angles, `approx_eq`          |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng`: deterministic per-agent RNG             |
//! | [`config`]      | `RoutingPolicy`                                       |
//! | [`priority`]    | `PriorityList`: sorted list keyed by a score         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod priority;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RoutingPolicy;
pub use error::{CoreError, CoreResult};
pub use geo::{approx_eq, Vec2, EPSILON};
pub use ids::{AgentId, EdgeId, NodeId, PassageId, RingId};
pub use priority::PriorityList;
pub use rng::AgentRng;
pub use time::{SimClock, SimConfig, Tick};
