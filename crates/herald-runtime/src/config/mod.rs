//! Configuration for the Herald runtime.
//!
//! Settings are layered with figment: built-in defaults, then a config file
//! (`herald.toml` / `herald.yaml`), then `HERALD_*` environment variables,
//! then programmatic merges. The result is checked by [`validate_config`]
//! before the runtime starts.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    AntiSpamSettings, BotConfig, DefaultsConfig, HeraldConfig, LogFormat, LogLevel, LogOutput,
    LoggingConfig, SpanEventConfig,
};
pub use validation::validate_config;
