//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed notification record.
    #[error("invalid notification on line {line}: {source}")]
    InvalidNotification {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] tritrack_core::Error),
}
