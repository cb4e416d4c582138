#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use herald::core::{ApiResult, ChatClient, Guild, PermissionSet, User};
use herald::prelude::{Channel, IncomingMessage};

/// Records every message the bot sends.
#[derive(Clone, Default)]
pub struct RecordingClient {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    guilds: Arc<Mutex<HashMap<String, Guild>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guild(self, guild: Guild) -> Self {
        self.guilds.lock().insert(guild.id.clone(), guild);
        self
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl ChatClient for RecordingClient {
    fn bot_id(&self) -> &str {
        "herald"
    }

    async fn bot_permissions(&self, _channel_id: &str) -> ApiResult<PermissionSet> {
        Ok(PermissionSet::administrator())
    }

    async fn user_permissions(&self, _channel_id: &str, _user_id: &str) -> ApiResult<PermissionSet> {
        Ok(PermissionSet::default())
    }

    async fn fetch_user(&self, _user_id: &str) -> ApiResult<Option<User>> {
        Ok(None)
    }

    async fn fetch_guild(&self, guild_id: &str) -> ApiResult<Option<Guild>> {
        Ok(self.guilds.lock().get(guild_id).cloned())
    }

    async fn send_typing(&self, _channel_id: &str) -> ApiResult<()> {
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> ApiResult<String> {
        let mut sent = self.sent.lock();
        sent.push((channel_id.to_owned(), content.to_owned()));
        Ok(sent.len().to_string())
    }
}

pub fn message(author: &str, channel: Channel, content: &str) -> IncomingMessage {
    IncomingMessage {
        id: format!("{author}:{content}"),
        channel,
        author: User::new(author, author),
        content: content.to_owned(),
    }
}
