//! `rn-sim`: pursuit tick loop for the ringnav framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Modes: ModeSelector decides chase or flee per pursuer.
//!   ② Plan : each pursuer blocks the others' positions and re-plans toward
//!             the quarry (chase) or its flee target (flee)
//!             (parallel with the `parallel` feature).
//!   ③ Move : in ascending AgentId order: orientation against the peer
//!             view, one step of agent_speed · tick_secs, snap onto the map.
//!   ④ Quarry advances.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the plan phase on Rayon's thread pool.            |
//! | `serde`    | Propagates serde derives to the `rn-*` value types.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rn_core::SimConfig;
//! use rn_map::layouts;
//! use rn_sim::{AlwaysChase, NoopObserver, Quarry, SimBuilder};
//!
//! let map = Arc::new(layouts::arena()?);
//! let mut sim = SimBuilder::new(SimConfig::default(), map, AlwaysChase)
//!     .pursuers(starts)
//!     .quarry(Quarry::Fixed(target))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod mode;
pub mod observer;
pub mod pursuer;
pub mod quarry;
pub mod row;
pub mod sim;
pub mod trace;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use mode::{AlwaysChase, FleeWindow, ModeSelector, PursuitMode, TickContext};
pub use observer::{NoopObserver, SimObserver};
pub use pursuer::Pursuer;
pub use quarry::Quarry;
pub use row::{PursuerSnapshot, TickSummary};
pub use sim::Sim;
pub use trace::CsvTrace;
