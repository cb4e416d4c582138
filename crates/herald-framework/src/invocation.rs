//! Per-message execution context.

use std::fmt;

use herald_core::{
    ApiResult, BoxedClient, Channel, Guild, GuildProfile, IncomingMessage, User, UserProfile,
};

/// Everything the pipeline and executors know about one command invocation.
///
/// Built by the host (or `HeraldRuntime`) after parsing a message, then
/// wrapped in an `Arc` for the duration of dispatch.
#[derive(Clone)]
pub struct Invocation {
    client: BoxedClient,
    message: IncomingMessage,
    guild: Option<Guild>,
    prefix: String,
    trigger: String,
    args: Vec<String>,
    user_profile: UserProfile,
    guild_profile: Option<GuildProfile>,
}

impl Invocation {
    /// Creates an invocation with default profiles and no guild data.
    pub fn new(
        client: BoxedClient,
        message: IncomingMessage,
        prefix: impl Into<String>,
        trigger: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            client,
            message,
            guild: None,
            prefix: prefix.into(),
            trigger: trigger.into(),
            args,
            user_profile: UserProfile::default(),
            guild_profile: None,
        }
    }

    pub fn with_guild(mut self, guild: Guild) -> Self {
        self.guild = Some(guild);
        self
    }

    pub fn with_user_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = profile;
        self
    }

    pub fn with_guild_profile(mut self, profile: GuildProfile) -> Self {
        self.guild_profile = Some(profile);
        self
    }

    pub fn client(&self) -> &BoxedClient {
        &self.client
    }

    pub fn message(&self) -> &IncomingMessage {
        &self.message
    }

    pub fn author(&self) -> &User {
        &self.message.author
    }

    pub fn author_id(&self) -> &str {
        &self.message.author.id
    }

    pub fn channel(&self) -> &Channel {
        &self.message.channel
    }

    pub fn channel_id(&self) -> &str {
        &self.message.channel.id
    }

    pub fn guild_id(&self) -> Option<&str> {
        self.message.guild_id()
    }

    /// Guild data, when the host fetched it.
    pub fn guild(&self) -> Option<&Guild> {
        self.guild.as_ref()
    }

    /// The prefix the message was invoked with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The trigger as typed by the user.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.user_profile
    }

    pub fn guild_profile(&self) -> Option<&GuildProfile> {
        self.guild_profile.as_ref()
    }

    /// Returns `true` if the user asked for help with `-h` or `--help`.
    pub fn wants_help(&self) -> bool {
        matches!(self.args.first().map(String::as_str), Some("-h" | "--help"))
    }

    /// Sends a message to the invocation's channel.
    pub async fn reply(&self, content: &str) -> ApiResult<String> {
        self.client.send_message(self.channel_id(), content).await
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("message", &self.message.id)
            .field("author", &self.message.author.id)
            .field("channel", &self.message.channel.id)
            .field("trigger", &self.trigger)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClient, invocation_in};

    #[test]
    fn test_help_flag_detection() {
        let client = MockClient::new();
        let inv = invocation_in(&client, Channel::direct("c"), "u", "ping --help");
        assert!(inv.wants_help());
        assert_eq!(inv.trigger(), "ping");

        let inv = invocation_in(&client, Channel::direct("c"), "u", "ping x -h");
        assert!(!inv.wants_help());
    }

    #[tokio::test]
    async fn test_reply_goes_to_channel() {
        let client = MockClient::new();
        let inv = invocation_in(&client, Channel::in_guild("chan", "g"), "u", "ping");
        inv.reply("pong").await.unwrap();
        assert_eq!(client.sent(), vec![("chan".to_string(), "pong".to_string())]);
        assert_eq!(inv.guild_id(), Some("g"));
    }
}
