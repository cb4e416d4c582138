//! Error types for the collaborator interfaces.
//!
//! Dispatch-level errors (duplicate registrations, usage errors and so on)
//! live in `herald-framework`. This module only covers failures reported by
//! the chat client and the configuration store.

use thiserror::Error;

// =============================================================================
// API Errors
// =============================================================================

/// Error type for chat-platform client calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The client is not connected to the platform.
    #[error("client is not connected")]
    NotConnected,
    /// The call timed out.
    #[error("API call timed out")]
    Timeout,
    /// The platform rejected the call.
    #[error("API error ({code}): {message}")]
    Rejected { code: i64, message: String },
    /// The requested entity does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Entity kind, e.g. `"channel"`.
        kind: &'static str,
        /// Entity identifier.
        id: String,
    },
    /// Failed to serialize/deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Creates a not-found error for the given entity kind.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors reported by a [`ConfigStore`](crate::store::ConfigStore).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A stored record could not be decoded.
    #[error("malformed record for '{key}': {reason}")]
    Malformed {
        /// The record key.
        key: String,
        /// Reason for failure.
        reason: String,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for client calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for store lookups.
pub type StoreResult<T> = Result<T, StoreError>;
