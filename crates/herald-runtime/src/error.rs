//! Runtime error types.

use thiserror::Error;

use herald_core::StoreError;
use herald_framework::{DispatchError, HandlerError};

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Loading a user or guild profile failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A registry operation failed while setting up the runtime.
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
