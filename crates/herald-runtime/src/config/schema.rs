//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use herald_core::{GuildProfile, UserProfile};
use herald_framework::{AntiSpamConfig, RestrictionSettings, SpamScope};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeraldConfig {
    /// Bot-wide dispatch settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Flood protection.
    #[serde(default)]
    pub anti_spam: AntiSpamSettings,

    /// Profiles served when the store has nothing for a user or guild.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// =============================================================================
// Bot
// =============================================================================

/// Bot-wide dispatch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Command prefix used when a guild has none of its own.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Whether this instance is a beta build.
    #[serde(default)]
    pub beta: bool,

    /// User ids with developer access.
    #[serde(default)]
    pub developers: Vec<String>,

    #[serde(default)]
    pub support_server_id: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            beta: false,
            developers: Vec::new(),
            support_server_id: None,
        }
    }
}

impl BotConfig {
    /// Settings for the default restriction predicates.
    pub fn restriction_settings(&self) -> RestrictionSettings {
        RestrictionSettings {
            beta: self.beta,
            developers: self.developers.clone(),
            support_server_id: self.support_server_id.clone(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

// =============================================================================
// Anti-spam
// =============================================================================

/// Flood protection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiSpamSettings {
    /// Sliding window length in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Hits allowed inside the window. `0` disables anti-spam.
    #[serde(default = "default_max_hits")]
    pub max_hits: usize,

    #[serde(default)]
    pub scope: SpamScope,
}

impl Default for AntiSpamSettings {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_hits: default_max_hits(),
            scope: SpamScope::default(),
        }
    }
}

impl AntiSpamSettings {
    pub fn to_anti_spam_config(&self) -> AntiSpamConfig {
        AntiSpamConfig {
            window: Duration::from_millis(self.window_ms),
            max_hits: self.max_hits,
            scope: self.scope,
        }
    }
}

fn default_window_ms() -> u64 {
    10_000
}

fn default_max_hits() -> usize {
    5
}

/// Default per-user and per-guild profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub user: UserProfile,
    #[serde(default)]
    pub guild: GuildProfile,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Requires `logging.file_path`.
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging settings consumed by [`LoggingBuilder`](crate::logging::LoggingBuilder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers.
    #[serde(default)]
    pub file_location: bool,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Per-module levels, e.g. `herald_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}
