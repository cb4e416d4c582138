//! Test doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use herald_core::{
    ApiError, ApiResult, BoxedClient, Channel, ChatClient, Guild, IncomingMessage, PermissionSet,
    User,
};

use crate::invocation::Invocation;
use crate::split::split_args;

#[derive(Default)]
struct MockState {
    bot_permissions: Mutex<PermissionSet>,
    user_permissions: Mutex<HashMap<String, PermissionSet>>,
    sent: Mutex<Vec<(String, String)>>,
    offline: Mutex<bool>,
}

/// A recording [`ChatClient`]. The bot holds every permission by default,
/// users hold none.
#[derive(Clone, Default)]
pub(crate) struct MockClient {
    state: Arc<MockState>,
}

impl MockClient {
    pub(crate) fn new() -> Self {
        let client = Self::default();
        *client.state.bot_permissions.lock() = PermissionSet::administrator();
        client
    }

    pub(crate) fn set_bot_permissions(&self, permissions: PermissionSet) {
        *self.state.bot_permissions.lock() = permissions;
    }

    pub(crate) fn grant_user(&self, user_id: &str, permissions: PermissionSet) {
        self.state
            .user_permissions
            .lock()
            .insert(user_id.to_owned(), permissions);
    }

    /// Makes every call fail with [`ApiError::NotConnected`].
    pub(crate) fn set_offline(&self, offline: bool) {
        *self.state.offline.lock() = offline;
    }

    /// `(channel, content)` pairs in send order.
    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.state.sent.lock().clone()
    }

    pub(crate) fn sent_texts(&self) -> Vec<String> {
        self.state.sent.lock().iter().map(|(_, c)| c.clone()).collect()
    }

    pub(crate) fn boxed(&self) -> BoxedClient {
        Arc::new(self.clone())
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
impl ChatClient for MockClient {
    fn bot_id(&self) -> &str {
        "bot"
    }

    async fn bot_permissions(&self, _channel_id: &str) -> ApiResult<PermissionSet> {
        self.ensure_online()?;
        Ok(self.state.bot_permissions.lock().clone())
    }

    async fn user_permissions(&self, _channel_id: &str, user_id: &str) -> ApiResult<PermissionSet> {
        self.ensure_online()?;
        Ok(self
            .state
            .user_permissions
            .lock()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_user(&self, _user_id: &str) -> ApiResult<Option<User>> {
        self.ensure_online()?;
        Ok(None)
    }

    async fn fetch_guild(&self, _guild_id: &str) -> ApiResult<Option<Guild>> {
        self.ensure_online()?;
        Ok(None)
    }

    async fn send_typing(&self, _channel_id: &str) -> ApiResult<()> {
        self.ensure_online()
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> ApiResult<String> {
        self.ensure_online()?;
        let mut sent = self.state.sent.lock();
        sent.push((channel_id.to_owned(), content.to_owned()));
        Ok(format!("m{}", sent.len()))
    }
}

/// Builds an invocation of `text` (without prefix) by `user_id` in `channel`.
pub(crate) fn invocation_in(
    client: &MockClient,
    channel: Channel,
    user_id: &str,
    text: &str,
) -> Invocation {
    let mut args = split_args(text);
    let trigger = if args.is_empty() {
        String::new()
    } else {
        args.remove(0).to_lowercase()
    };
    let message = IncomingMessage {
        id: "msg".into(),
        channel,
        author: User::new(user_id, user_id),
        content: format!("!{text}"),
    };
    Invocation::new(client.boxed(), message, "!", trigger, args)
}

/// Shorthand for a direct-message invocation wrapped in an `Arc`.
pub(crate) fn invoke(client: &MockClient, user_id: &str, text: &str) -> Arc<Invocation> {
    Arc::new(invocation_in(client, Channel::direct("chan"), user_id, text))
}
