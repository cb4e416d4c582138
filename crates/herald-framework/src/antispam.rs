//! Sliding-window flood protection.
//!
//! Independent of cooldowns: every invocation that reaches the cooldown step
//! is recorded here, including those rejected by an active cooldown. A user
//! who keeps hammering a command on cooldown is therefore eventually
//! suppressed entirely and stops receiving cooldown notices.
//!
//! A key's history is pruned whenever that key is checked. Keys that go
//! quiet are dropped by a sweep that runs at most once per window.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{trace, warn};

use crate::command::Command;

/// What the hit counter is keyed by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpamScope {
    /// One counter per user across all commands.
    #[default]
    User,
    /// One counter per user and command.
    UserCommand,
}

/// Anti-spam parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntiSpamConfig {
    /// Length of the sliding window.
    pub window: Duration,
    /// Hits allowed inside the window. `0` disables the filter.
    pub max_hits: usize,
    pub scope: SpamScope,
}

impl Default for AntiSpamConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(10),
            max_hits: 5,
            scope: SpamScope::User,
        }
    }
}

impl AntiSpamConfig {
    pub fn disabled() -> Self {
        Self {
            max_hits: 0,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_hits > 0
    }
}

/// Result of recording one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpamVerdict {
    pub allowed: bool,
    /// Hits inside the window, including this one.
    pub hits: usize,
}

#[derive(Debug, Default)]
struct SpamState {
    hits: HashMap<String, VecDeque<Instant>>,
    last_sweep: Option<Instant>,
}

impl SpamState {
    /// Drops every key whose newest hit has left the window.
    fn sweep(&mut self, now: Instant, window: Duration) {
        let before = self.hits.len();
        self.hits
            .retain(|_, history| history.back().is_some_and(|t| now.duration_since(*t) <= window));
        self.last_sweep = Some(now);
        let dropped = before - self.hits.len();
        if dropped > 0 {
            trace!(dropped, remaining = self.hits.len(), "Anti-spam keys swept");
        }
    }
}

/// Per-user hit history.
#[derive(Debug, Default)]
pub struct AntiSpam {
    config: AntiSpamConfig,
    state: Mutex<SpamState>,
}

impl AntiSpam {
    pub fn new(config: AntiSpamConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SpamState::default()),
        }
    }

    pub fn config(&self) -> &AntiSpamConfig {
        &self.config
    }

    /// Records a hit and decides whether the invocation may proceed.
    pub fn check(&self, user_id: &str, command: &Command) -> SpamVerdict {
        if !self.config.is_enabled() {
            return SpamVerdict {
                allowed: true,
                hits: 0,
            };
        }

        let key = self.key(user_id, command);
        let now = Instant::now();
        let window = self.config.window;
        let mut state = self.state.lock();
        match state.last_sweep {
            Some(last) if now.duration_since(last) <= window => {}
            Some(_) => state.sweep(now, window),
            None => state.last_sweep = Some(now),
        }

        let history = state.hits.entry(key).or_default();
        while history
            .front()
            .is_some_and(|t| now.duration_since(*t) > window)
        {
            history.pop_front();
        }
        history.push_back(now);

        let count = history.len();
        let allowed = count <= self.config.max_hits;
        if !allowed {
            warn!(
                user = user_id,
                command = command.key(),
                hits = count,
                "Invocation suppressed by anti-spam"
            );
        }
        SpamVerdict {
            allowed,
            hits: count,
        }
    }

    /// Forgets every hit recorded for a user.
    pub fn reset(&self, user_id: &str) {
        let prefix = format!("{user_id}\u{0}");
        self.state
            .lock()
            .hits
            .retain(|key, _| key != user_id && !key.starts_with(&prefix));
    }

    /// Number of keys with recorded history.
    pub fn tracked_keys(&self) -> usize {
        self.state.lock().hits.len()
    }

    fn key(&self, user_id: &str, command: &Command) -> String {
        match self.config.scope {
            SpamScope::User => user_id.to_owned(),
            SpamScope::UserCommand => format!("{user_id}\u{0}{}", command.key()),
        }
    }
}
