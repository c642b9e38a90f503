//! Error types for index construction and queries.

use thiserror::Error;

/// Error variants for full-text index operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An index was provided that is out of the structure's bounds.
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// A structural invariant was violated while building the index.
    ///
    /// No partially-built index is usable; construction aborts as soon as
    /// one of these is detected.
    #[error("construction failed: {0}")]
    Construction(String),

    /// A query requires a feature that was not enabled at construction.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// A specialized Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;
