//! Per-user, per-command cooldowns.
//!
//! Entries are kept in a flat list and pruned lazily: an expired entry is
//! only removed when it is next checked. Dispatch goes through
//! [`CooldownHandler::check_or_start`], which checks and inserts under one
//! lock, so at most one entry exists per `(user, command)` pair even when
//! invocations race on different worker threads.
//!
//! Durations are not bounded. An entry whose end lies beyond what
//! [`Instant`] can represent simply never expires.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::command::Command;

/// The smallest remaining time ever reported for an active cooldown.
pub const MIN_REMAINING: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
struct CooldownEntry {
    user_id: String,
    command: String,
    start: Instant,
    duration: Duration,
}

impl CooldownEntry {
    fn is(&self, user_id: &str, command: &str) -> bool {
        self.user_id == user_id && self.command == command
    }

    /// Time left at `now`, or `None` once strictly past the end.
    fn remaining_at(&self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed <= self.duration).then(|| self.duration - elapsed)
    }
}

fn active(remaining: Duration) -> CooldownState {
    let millis = u64::try_from((remaining.as_nanos() + 500_000) / 1_000_000).unwrap_or(u64::MAX);
    CooldownState {
        active: true,
        remaining: Duration::from_millis(millis).max(MIN_REMAINING),
    }
}

/// Result of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownState {
    pub active: bool,
    /// Zero when inactive.
    pub remaining: Duration,
}

impl CooldownState {
    pub const INACTIVE: Self = Self {
        active: false,
        remaining: Duration::ZERO,
    };
}

/// Tracks active cooldowns.
#[derive(Debug, Default)]
pub struct CooldownHandler {
    entries: Mutex<Vec<CooldownEntry>>,
}

impl CooldownHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the command's regular cooldown for a user.
    pub fn add_cooldown(&self, user_id: &str, command: &Command) -> Instant {
        self.add_cooldown_for(user_id, command, command.cooldown_duration())
    }

    /// Starts a cooldown of an explicit duration. Does not check for an
    /// existing entry.
    pub fn add_cooldown_for(&self, user_id: &str, command: &Command, duration: Duration) -> Instant {
        let start = Instant::now();
        self.entries.lock().push(CooldownEntry {
            user_id: user_id.to_owned(),
            command: command.key().to_owned(),
            start,
            duration,
        });
        debug!(user = user_id, command = command.key(), ?duration, "Cooldown started");
        start
    }

    /// Checks whether a user is on cooldown for a command.
    ///
    /// An entry is expired once the current time is strictly past its end;
    /// expired entries are removed. The remaining time of an active entry is
    /// rounded to whole milliseconds and never reported below one second.
    pub fn check_cooldown(&self, user_id: &str, command: &Command) -> CooldownState {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let Some(idx) = entries.iter().position(|e| e.is(user_id, command.key())) else {
            return CooldownState::INACTIVE;
        };

        match entries[idx].remaining_at(now) {
            Some(remaining) => active(remaining),
            None => {
                entries.remove(idx);
                CooldownState::INACTIVE
            }
        }
    }

    /// Checks the cooldown and, if none is active, starts one of `duration`
    /// in the same critical section.
    ///
    /// Returns the state seen before starting: inactive means the caller now
    /// holds a fresh cooldown and may run the command.
    pub fn check_or_start(
        &self,
        user_id: &str,
        command: &Command,
        duration: Duration,
    ) -> CooldownState {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        if let Some(idx) = entries.iter().position(|e| e.is(user_id, command.key())) {
            match entries[idx].remaining_at(now) {
                Some(remaining) => return active(remaining),
                None => {
                    entries.swap_remove(idx);
                }
            }
        }

        entries.push(CooldownEntry {
            user_id: user_id.to_owned(),
            command: command.key().to_owned(),
            start: now,
            duration,
        });
        debug!(user = user_id, command = command.key(), ?duration, "Cooldown started");
        CooldownState::INACTIVE
    }

    /// Removes the entry for a user and command. Returns `true` if one existed.
    pub fn remove_cooldown(&self, user_id: &str, command: &Command) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| !e.is(user_id, command.key()));
        let removed = entries.len() != before;
        if removed {
            debug!(user = user_id, command = command.key(), "Cooldown removed");
        }
        removed
    }

    /// Drops every cooldown of a user, returning how many were removed.
    pub fn clear_user(&self, user_id: &str) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| e.user_id != user_id);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
