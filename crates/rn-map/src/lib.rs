//! `rn-map`: the ring-and-passageway topology model.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`ring`]    | `Ring`, `Rotation`                                          |
//! | [`passage`] | `Passageway`                                                |
//! | [`pathway`] | `PathwayGeometry` trait, `Pathway` enum, `PathwayId`        |
//! | [`map`]     | `CircularMap` authoring, closest-point and random queries   |
//! | [`loader`]  | `load_map_csv`, `load_map_reader`                           |
//! | [`layouts`] | `arena()` reference layout                                  |
//! | [`error`]   | `MapError`, `MapResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on rings, passageways and ids. |

pub mod error;
pub mod layouts;
pub mod loader;
pub mod map;
pub mod passage;
pub mod pathway;
pub mod ring;


pub use error::{MapError, MapResult};
pub use loader::{load_map_csv, load_map_reader};
pub use map::{CircularMap, CHEAT_THRESHOLD, MARGIN};
pub use passage::Passageway;
pub use pathway::{Pathway, PathwayGeometry, PathwayId};
pub use ring::{Ring, Rotation};
