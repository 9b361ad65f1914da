//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The base error type for `rn-core` primitives.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("peek or dequeue on an empty priority list")]
    EmptyQueue,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
