//! The chat-platform client interface.
//!
//! Herald does not own a gateway connection. Hosts implement [`ChatClient`]
//! on top of whatever platform library they use; the dispatch core only ever
//! calls the handful of methods below.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::model::{Guild, User};
use crate::permission::PermissionSet;

/// The narrow client surface consumed by the dispatch core.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct MyClient { http: Http }
///
/// #[async_trait]
/// impl ChatClient for MyClient {
///     fn bot_id(&self) -> &str { &self.http.current_user_id }
///     async fn bot_permissions(&self, channel_id: &str) -> ApiResult<PermissionSet> {
///         self.http.effective_permissions(channel_id, self.bot_id()).await
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ChatClient: Send + Sync + 'static {
    /// Returns the bot account's user id.
    fn bot_id(&self) -> &str;

    /// Effective permissions of the bot in a channel.
    async fn bot_permissions(&self, channel_id: &str) -> ApiResult<PermissionSet>;

    /// Effective permissions of a user in a channel.
    async fn user_permissions(&self, channel_id: &str, user_id: &str)
    -> ApiResult<PermissionSet>;

    /// Fetches a user from the platform. `Ok(None)` when the user does not exist.
    async fn fetch_user(&self, user_id: &str) -> ApiResult<Option<User>>;

    /// Fetches a guild from the platform. `Ok(None)` when the guild does not exist.
    async fn fetch_guild(&self, guild_id: &str) -> ApiResult<Option<Guild>>;

    /// Sends a single typing indicator to a channel.
    async fn send_typing(&self, channel_id: &str) -> ApiResult<()>;

    /// Sends a text message to a channel, returning the new message id.
    async fn send_message(&self, channel_id: &str, content: &str) -> ApiResult<String>;
}

/// A shared client trait object.
pub type BoxedClient = Arc<dyn ChatClient>;
