//! Topology error type.

use thiserror::Error;

use rn_core::RingId;

/// Errors produced while authoring, validating or loading a map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("ring radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("invalid passageway: {0}")]
    InvalidPassageway(String),

    #[error("ring index {0} out of range")]
    RingNotFound(usize),

    #[error("a passage needs two rings, map has {found}")]
    NotEnoughRings { found: usize },

    #[error("{ring} has {attachments} passage attachment(s); at least 2 are required")]
    UnderConnectedRing { ring: RingId, attachments: usize },

    #[error("passageway references a ring that is not part of the map")]
    ForeignRing,

    #[error("map has no rings")]
    EmptyMap,

    #[error("map parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MapResult<T> = Result<T, MapError>;
