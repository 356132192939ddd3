//! Pantry error types

use std::path::PathBuf;

/// Pantry error types
#[derive(Debug, thiserror::Error)]
pub enum PantryError {
    // Caller errors
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed protocol line from a client.
    #[error("{0}")]
    InvalidMessage(String),

    // Authoritative misses
    #[error("not found: {0}")]
    NotFound(String),

    /// Barcode lookups never fall back to the remote provider, so a miss
    /// means no earlier keyword search returned this barcode.
    #[error("barcode not found in cache: {0}")]
    BarcodeNotFound(String),

    /// Cache I/O failure, transport failure or unexpected remote status,
    /// wrapped with the operation and key that triggered it.
    #[error("{operation} failed for '{key}': {reason}")]
    Retrieval {
        operation: &'static str,
        key: String,
        reason: String,
    },

    // Storage errors
    #[error("cache I/O error at {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not decode barcode from {}: {reason}", path.display())]
    BarcodeDecode { path: PathBuf, reason: String },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PantryError {
    /// Whether this error means "does not exist" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PantryError::NotFound(_) | PantryError::BarcodeNotFound(_)
        )
    }

    /// Wrap an underlying failure as a [`PantryError::Retrieval`].
    pub(crate) fn retrieval(
        operation: &'static str,
        key: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        PantryError::Retrieval {
            operation,
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for Pantry operations
pub type Result<T> = std::result::Result<T, PantryError>;
