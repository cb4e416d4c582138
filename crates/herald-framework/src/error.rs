//! Error types for the Herald framework.
//!
//! Errors fall into three groups:
//!
//! - [`HandlerError`]: registry operations (`add_category`, lookups, reload).
//!   Raised synchronously and never swallowed.
//! - [`CommandError`]: returned by executors and override hooks.
//!   [`CommandError::InvalidUsage`] is routed to the `invalid_usage` hook,
//!   everything else reaches the host.
//! - [`DispatchError`]: what [`CommandHandler::dispatch`] hands back to the
//!   host's top-level handler.
//!
//! Permission, restriction and cooldown failures are not errors at all; they
//! are [`DispatchOutcome`](crate::dispatch::DispatchOutcome) variants.
//!
//! [`CommandHandler::dispatch`]: crate::handler::CommandHandler::dispatch

use thiserror::Error;

use herald_core::{ApiError, StoreError};

use crate::category::SourceRef;

/// Errors raised by registry operations on [`CommandHandler`](crate::handler::CommandHandler).
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// A required argument was missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A category with the same name is already registered.
    #[error("duplicate category \"{name}\" in \"{incoming}\" (already registered from \"{existing}\")")]
    DuplicateCategory {
        /// The conflicting category name.
        name: String,
        /// Source of the category being added.
        incoming: SourceRef,
        /// Source of the category already registered.
        existing: SourceRef,
    },

    /// A trigger collides with one that is already registered.
    #[error("duplicate command \"{trigger}\" in \"{incoming}\" (already registered from \"{existing}\")")]
    DuplicateCommand {
        /// The conflicting trigger.
        trigger: String,
        /// Source of the command being added.
        incoming: SourceRef,
        /// Source of the command already holding the trigger.
        existing: SourceRef,
    },

    /// The category to reload is not registered.
    #[error("category \"{0}\" not found")]
    CategoryNotFound(String),

    /// The category loader failed.
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl HandlerError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Errors raised by a [`CategoryLoader`](crate::loader::CategoryLoader).
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// Nothing is registered under the given source.
    #[error("no category source registered for \"{0}\"")]
    NotFound(SourceRef),

    /// The source exists but could not produce a category.
    #[error("failed to load category from \"{origin}\": {reason}")]
    Failed {
        /// The source that failed.
        origin: SourceRef,
        /// Reason for failure.
        reason: String,
    },
}

/// A usage error raised by an executor when its arguments are wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UsageError {
    /// Human-readable detail shown to the user.
    pub message: String,
}

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A usage error for a missing positional argument.
    pub fn missing_argument(name: &str) -> Self {
        Self::new(format!("missing required argument `{name}`"))
    }
}

/// Errors returned by command executors and override hooks.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// The command was invoked with invalid arguments.
    #[error("invalid usage: {0}")]
    InvalidUsage(UsageError),

    /// A chat client call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A store lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Any other failure.
    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    /// Creates an invalid usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::InvalidUsage(UsageError::new(message))
    }

    /// Creates a generic failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<UsageError> for CommandError {
    fn from(err: UsageError) -> Self {
        Self::InvalidUsage(err)
    }
}

/// Errors surfaced from a dispatch to the host application.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// A client call made by the pipeline itself failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An executor or override hook failed with an unhandled error.
    #[error("command \"{trigger}\" failed: {source}")]
    Command {
        /// The command's first trigger.
        trigger: String,
        /// The underlying error.
        #[source]
        source: CommandError,
    },

    /// The resolved command has no executor.
    #[error("command \"{0}\" has no executor")]
    MissingExecutor(String),
}

/// Result type for registry operations.
pub type HandlerResult<T> = Result<T, HandlerError>;
