//! Test doubles for the runtime's unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use herald_core::{ApiError, ApiResult, ChatClient, Guild, PermissionSet, User};

#[derive(Default)]
struct StubState {
    users: Mutex<HashMap<String, User>>,
    guilds: Mutex<HashMap<String, Guild>>,
    user_fetches: Mutex<usize>,
    guild_fetches: Mutex<usize>,
    typing: Mutex<Vec<String>>,
    sent: Mutex<Vec<(String, String)>>,
    offline: Mutex<bool>,
}

/// A [`ChatClient`] backed by in-memory maps that counts its calls.
///
/// The bot holds every permission; users hold none.
#[derive(Clone, Default)]
pub(crate) struct StubClient {
    state: Arc<StubState>,
}

impl StubClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_user(&self, user: User) {
        self.state.users.lock().insert(user.id.clone(), user);
    }

    pub(crate) fn add_guild(&self, guild: Guild) {
        self.state.guilds.lock().insert(guild.id.clone(), guild);
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        *self.state.offline.lock() = offline;
    }

    pub(crate) fn user_fetches(&self) -> usize {
        *self.state.user_fetches.lock()
    }

    pub(crate) fn guild_fetches(&self) -> usize {
        *self.state.guild_fetches.lock()
    }

    /// Channels that received a typing indicator, in order.
    pub(crate) fn typing(&self) -> Vec<String> {
        self.state.typing.lock().clone()
    }

    pub(crate) fn sent_texts(&self) -> Vec<String> {
        self.state.sent.lock().iter().map(|(_, c)| c.clone()).collect()
    }

    fn ensure_online(&self) -> ApiResult<()> {
        if *self.state.offline.lock() {
            Err(ApiError::NotConnected)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatClient for StubClient {
    fn bot_id(&self) -> &str {
        "bot"
    }

    async fn bot_permissions(&self, _channel_id: &str) -> ApiResult<PermissionSet> {
        self.ensure_online()?;
        Ok(PermissionSet::administrator())
    }

    async fn user_permissions(&self, _channel_id: &str, _user_id: &str) -> ApiResult<PermissionSet> {
        self.ensure_online()?;
        Ok(PermissionSet::default())
    }

    async fn fetch_user(&self, user_id: &str) -> ApiResult<Option<User>> {
        self.ensure_online()?;
        *self.state.user_fetches.lock() += 1;
        Ok(self.state.users.lock().get(user_id).cloned())
    }

    async fn fetch_guild(&self, guild_id: &str) -> ApiResult<Option<Guild>> {
        self.ensure_online()?;
        *self.state.guild_fetches.lock() += 1;
        Ok(self.state.guilds.lock().get(guild_id).cloned())
    }

    async fn send_typing(&self, channel_id: &str) -> ApiResult<()> {
        self.ensure_online()?;
        self.state.typing.lock().push(channel_id.to_owned());
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> ApiResult<String> {
        self.ensure_online()?;
        let mut sent = self.state.sent.lock();
        sent.push((channel_id.to_owned(), content.to_owned()));
        Ok(format!("m{}", sent.len()))
    }
}
