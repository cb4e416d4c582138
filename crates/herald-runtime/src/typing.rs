//! Repeating typing indicators.
//!
//! Platforms show a typing indicator for a few seconds after each request.
//! [`TypingIndicator`] keeps one alive for slow commands by resending it on
//! a fixed interval from a background task, one task per channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use herald_core::BoxedClient;

/// Delay between two typing sends.
pub const TYPING_INTERVAL: Duration = Duration::from_secs(7);

/// Rounds used by [`TypingIndicator::start_default`].
pub const DEFAULT_ROUNDS: u32 = 6;

struct ActiveTyping {
    generation: u64,
    token: CancellationToken,
}

type ActiveMap = Arc<Mutex<HashMap<String, ActiveTyping>>>;

pub struct TypingIndicator {
    client: BoxedClient,
    active: ActiveMap,
    generation: AtomicU64,
}

impl TypingIndicator {
    pub fn new(client: BoxedClient) -> Self {
        Self {
            client,
            active: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    /// Sends typing to `channel_id` now and every [`TYPING_INTERVAL`] until
    /// `rounds` sends have been made or [`stop`](Self::stop) is called.
    ///
    /// Starting on a channel that already has an indicator replaces it.
    /// Must be called from within a tokio runtime.
    pub fn start(&self, channel_id: &str, rounds: u32) {
        let rounds = rounds.max(1);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.active.lock().insert(
            channel_id.to_owned(),
            ActiveTyping {
                generation,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            previous.token.cancel();
        }

        debug!(channel = %channel_id, rounds, "Starting typing indicator");

        let client = Arc::clone(&self.client);
        let active = Arc::clone(&self.active);
        let channel = channel_id.to_owned();
        tokio::spawn(async move {
            for round in 0..rounds {
                if round > 0 {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = tokio::time::sleep(TYPING_INTERVAL) => {}
                    }
                }
                if let Err(e) = client.send_typing(&channel).await {
                    warn!(channel = %channel, error = %e, "Failed to send typing indicator");
                    break;
                }
            }

            let mut active = active.lock();
            if active.get(&channel).is_some_and(|a| a.generation == generation) {
                active.remove(&channel);
            }
        });
    }

    pub fn start_default(&self, channel_id: &str) {
        self.start(channel_id, DEFAULT_ROUNDS);
    }

    /// Stops the indicator on `channel_id`. Returns whether one was running.
    pub fn stop(&self, channel_id: &str) -> bool {
        match self.active.lock().remove(channel_id) {
            Some(active) => {
                active.token.cancel();
                debug!(channel = %channel_id, "Stopped typing indicator");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, channel_id: &str) -> bool {
        self.active.lock().contains_key(channel_id)
    }

    pub fn stop_all(&self) {
        for (_, active) in self.active.lock().drain() {
            active.token.cancel();
        }
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        self.stop_all();
    }
}

impl std::fmt::Debug for TypingIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingIndicator")
            .field("active", &self.active.lock().len())
            .finish()
    }
}
