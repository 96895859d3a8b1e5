//! Error types for ephemail.

use thiserror::Error;

/// Common error type for ephemail.
#[derive(Error, Debug)]
pub enum EphemailError {
    /// Malformed or empty user input (e.g. a blank address).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A uniqueness conflict (e.g. the address is already taken).
    ///
    /// Kept separate from [`EphemailError::InvalidInput`] so a client can
    /// distinguish "try a different name" from "fix your input".
    #[error("{0} already exists")]
    Conflict(String),

    /// Resource not found (mailbox or email absent or expired).
    #[error("{0} not found")]
    NotFound(String),

    /// Underlying store failure.
    ///
    /// This is the only fatal class; the core performs no retry on it.
    #[error("store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Store errors that are not uniqueness/referential violations handled at the
// call site collapse into the Store variant.
impl From<sqlx::Error> for EphemailError {
    fn from(e: sqlx::Error) -> Self {
        EphemailError::Store(e.to_string())
    }
}

/// Result type alias for ephemail operations.
pub type Result<T> = std::result::Result<T, EphemailError>;
