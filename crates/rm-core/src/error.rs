//! Core error type.
//!
//! Higher crates wrap `CoreError` in their own enums via `From` impls so that
//! configuration failures surface through a single `?`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
