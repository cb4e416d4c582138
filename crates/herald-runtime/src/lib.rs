//! Herald Runtime - hosting layer for the Herald command framework.
//!
//! This crate provides:
//! - Layered configuration (`HeraldConfig`, `ConfigLoader`)
//! - Logging setup (`LoggingBuilder`)
//! - Cached user and guild lookups (`Lookup`)
//! - Repeating typing indicators (`TypingIndicator`)
//! - Message intake and dispatch orchestration (`HeraldRuntime`)
//!
//! ```ignore
//! use herald_runtime::HeraldRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = Arc::new(HeraldRuntime::builder(client).init_logging(true).build()?);
//!     runtime.handler().add_category(util::category())?;
//!     runtime.run(gateway.messages()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod runtime;
pub mod typing;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use config::{
    BotConfig, ConfigError, ConfigLoader, ConfigResult, HeraldConfig, LoggingConfig, load_config,
    load_config_from_file,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, init_from_config};
pub use lookup::{DEFAULT_USER_CAPACITY, Lookup};
pub use runtime::{HeraldRuntime, RuntimeBuilder};
pub use typing::{DEFAULT_ROUNDS, TYPING_INTERVAL, TypingIndicator};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for command code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
