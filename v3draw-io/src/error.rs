//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// The sink rejected a seek or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Planning or encoding failed.
    #[error("core error: {0}")]
    Core(#[from] v3draw_core::Error),

    /// A plane source failed to produce a plane.
    #[error("plane source error: {0}")]
    Source(String),

    /// The parallel writer could not start its worker pool.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Invalid writer configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns the core error, if this is one.
    #[must_use]
    pub fn as_core(&self) -> Option<&v3draw_core::Error> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }
}
