//! # Herald Framework
//!
//! The command-dispatch core of Herald.
//!
//! This layer provides:
//! - [`Command`] descriptors with a fixed table of override hooks
//! - [`Category`] containers and hot-reloadable [`CategoryLoader`]s
//! - [`CommandHandler`], which owns the registry and runs the dispatch pipeline
//! - [`CooldownHandler`] and [`AntiSpam`], the two independent rate gates
//! - [`RestrictionSet`], the named precondition predicates
//! - A tower [`CommandService`] wrapper for middleware composition
//! - Clap-based argument parsing (with the `args` feature)
//!
//! # Dispatch order
//!
//! ```text
//! resolve trigger ─▶ bot permissions ─▶ user permissions ─▶ restrictions
//!                 ─▶ cooldown ─▶ anti-spam ─▶ executor
//! ```
//!
//! Every failing step runs the command's matching override hook. When the
//! hook returns [`HookOutcome::Default`] the handler sends the built-in
//! response from [`responses`].

pub mod antispam;
pub mod category;
pub mod command;
pub mod cooldown;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod invocation;
pub mod loader;
pub mod overrides;
pub mod responses;
pub mod restriction;
pub mod service;
pub mod split;

#[cfg(feature = "args")]
pub mod args;

#[cfg(test)]
pub(crate) mod testing;

pub use antispam::{AntiSpam, AntiSpamConfig, SpamScope, SpamVerdict};
pub use category::{Category, SourceRef};
pub use command::{BoxFuture, Command, CommandPermissions, Executor};
pub use cooldown::{CooldownHandler, CooldownState};
pub use dispatch::DispatchOutcome;
pub use error::{CommandError, DispatchError, HandlerError, LoadError, UsageError};
pub use handler::{CategoryRef, CommandHandler, CommandHandlerBuilder, CommandRef};
pub use invocation::Invocation;
pub use loader::{CategoryFactory, CategoryLoader, ModuleLoader};
pub use overrides::{
    HookArgs, HookContext, HookId, HookOutcome, OverrideFn, Overrides, PermissionScope,
};
pub use restriction::{Restriction, RestrictionFn, RestrictionSet, RestrictionSettings};
pub use service::CommandService;
pub use split::{parse_command, split_args};

#[cfg(feature = "args")]
pub use args::parse_args;
