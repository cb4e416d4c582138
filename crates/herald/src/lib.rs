//! # Herald
//!
//! A command-dispatch framework for chat bots.
//!
//! ## Overview
//!
//! Herald sits between a chat platform and a bot's commands. It maps
//! triggers to [`Command`](herald_framework::Command)s grouped into
//! hot-reloadable [`Category`](herald_framework::Category)s, and runs every
//! invocation through a fixed gate sequence before the command executes.
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌────────────────────────────────────────┐
//! │ Platform │──▶│ HeraldRuntime │──▶│ CommandHandler                         │
//! │ (client) │   │ prefix, parse │   │ perms ▶ restrictions ▶ cooldown        │──▶ executor
//! └──────────┘   │ profiles      │   │       ▶ anti-spam ▶ override hooks     │
//!                └───────────────┘   └────────────────────────────────────────┘
//! ```
//!
//! - **herald-core**: the [`ChatClient`](herald_core::ChatClient) and
//!   [`ConfigStore`](herald_core::ConfigStore) traits plus plain data types
//! - **herald-framework**: registry, gates, override hooks, dispatch
//! - **herald-runtime**: configuration, logging, lookups, typing indicator
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//!
//! fn util() -> Category {
//!     Category::new("util", "util.rs").command(
//!         Command::new(["ping", "p"])?
//!             .description("Checks that the bot is alive")
//!             .cooldown(Duration::from_secs(3), true)
//!             .executor(|inv, _| async move {
//!                 inv.reply("pong").await?;
//!                 Ok(())
//!             }),
//!     )
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = Arc::new(HeraldRuntime::builder(client).init_logging(true).build()?);
//!     runtime.handler().add_category(util())?;
//!     runtime.run(messages).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: `herald.toml` configuration files
//! - `yaml-config`: `herald.yaml` configuration files
//! - `json-log`: JSON log output
//! - `args`: clap-based typed argument parsing

pub use herald_core as core;
pub use herald_framework as framework;
pub use herald_runtime as runtime;

/// Commonly used types for building a bot.
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    // Entry point
    pub use herald_runtime::{HeraldConfig, HeraldRuntime, RuntimeError, RuntimeResult};

    // Defining commands
    pub use herald_framework::{
        Category, Command, CommandError, HookArgs, HookContext, HookId, HookOutcome, Invocation,
        Restriction, UsageError,
    };

    // Registry and dispatch
    pub use herald_framework::{
        CommandHandler, DispatchOutcome, HandlerError, ModuleLoader, RestrictionSet,
        RestrictionSettings,
    };

    #[cfg(feature = "args")]
    pub use herald_framework::parse_args;

    // Platform surface
    pub use herald_core::{
        BoxedClient, Channel, ChatClient, ConfigStore, Guild, GuildProfile, IncomingMessage,
        Permission, PermissionSet, User, UserProfile,
    };

    pub use std::sync::Arc;
    pub use std::time::Duration;
}
