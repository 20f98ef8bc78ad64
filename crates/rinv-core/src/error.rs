//! Error types for the rinv-core library.

use thiserror::Error;

/// Main error type for the rinv library.
#[derive(Error, Debug)]
pub enum RinvError {
    /// The host record could not be normalized.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Table probe reported by the host failed.
    #[error("table probe failed: {0}")]
    Probe(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while normalizing a host record.
///
/// These are always recoverable: the update controller turns them into a
/// status message and waits for the next record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The host reported no active record.
    #[error("no row selected")]
    NoRowSelected,

    /// `References` was present but not a mapping.
    #[error("could not understand References")]
    References,
}

/// Result type for the rinv library.
pub type Result<T> = std::result::Result<T, RinvError>;
