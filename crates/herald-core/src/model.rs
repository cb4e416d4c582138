//! Plain data types exchanged with the chat client.

use serde::{Deserialize, Serialize};

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            bot: false,
        }
    }
}

/// A guild (server) a channel belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

/// A text channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    /// `None` for direct messages.
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
}

impl Channel {
    /// Creates a direct-message channel.
    pub fn direct(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            guild_id: None,
            nsfw: false,
        }
    }

    /// Creates a guild text channel.
    pub fn in_guild(id: impl Into<String>, guild_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            guild_id: Some(guild_id.into()),
            nsfw: false,
        }
    }

    /// Marks the channel as NSFW (builder pattern).
    pub fn nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = nsfw;
        self
    }
}

/// An inbound message event as delivered by the platform client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: String,
    pub channel: Channel,
    pub author: User,
    pub content: String,
}

impl IncomingMessage {
    /// Returns the guild id of the channel, if any.
    pub fn guild_id(&self) -> Option<&str> {
        self.channel.guild_id.as_deref()
    }
}
