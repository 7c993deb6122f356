//! Error types for tritrack-core.

use thiserror::Error;

/// Result type alias for tritrack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for tritrack operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid pixel grid description.
    #[error("invalid pixel grid: {0}")]
    InvalidGrid(String),

    /// Outer planes share the same z, so no line can be drawn between them.
    #[error("degenerate baseline: first and third plane hits both at z = {z} mm")]
    DegenerateBaseline { z: f64 },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
