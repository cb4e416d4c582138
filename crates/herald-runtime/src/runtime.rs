//! Message intake and orchestration.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use herald_runtime::HeraldRuntime;
//!
//! let runtime = Arc::new(
//!     HeraldRuntime::builder(client)
//!         .config_file("herald.toml")
//!         .init_logging(true)
//!         .build()?,
//! );
//! runtime.handler().add_category(fun::category())?;
//!
//! // `messages` is any stream of inbound messages from the platform.
//! runtime.run(messages).await?;
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::signal;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, Level, debug, error, info, span, warn};

use herald_core::{BoxedClient, BoxedStore, IncomingMessage, StaticConfigStore};
use herald_framework::{
    CategoryLoader, CommandHandler, DispatchOutcome, Invocation, RestrictionSet, parse_command,
};

use crate::config::{ConfigLoader, HeraldConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;
use crate::lookup::Lookup;
use crate::typing::TypingIndicator;

/// Turns inbound platform messages into dispatches.
///
/// The runtime owns the [`CommandHandler`], the profile store, cached
/// lookups and the typing indicator. Hosts feed it messages either one at a
/// time through [`handle_message`](Self::handle_message) or as a stream
/// through [`run`](Self::run).
pub struct HeraldRuntime {
    config: HeraldConfig,
    client: BoxedClient,
    store: BoxedStore,
    handler: Arc<CommandHandler>,
    lookup: Lookup,
    typing: TypingIndicator,
    tracker: TaskTracker,
}

impl HeraldRuntime {
    pub fn builder(client: BoxedClient) -> RuntimeBuilder {
        RuntimeBuilder::new(client)
    }

    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    pub fn client(&self) -> &BoxedClient {
        &self.client
    }

    pub fn store(&self) -> &BoxedStore {
        &self.store
    }

    pub fn handler(&self) -> &Arc<CommandHandler> {
        &self.handler
    }

    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    pub fn typing(&self) -> &TypingIndicator {
        &self.typing
    }

    /// Handles one inbound message.
    ///
    /// The prefix comes from the guild profile when it sets one, otherwise
    /// from `bot.prefix`. Messages from bots (including this one), messages
    /// without the prefix and unknown triggers yield
    /// [`DispatchOutcome::NoCommand`] before the user profile is loaded.
    pub async fn handle_message(&self, message: IncomingMessage) -> RuntimeResult<DispatchOutcome> {
        if message.author.bot || message.author.id == self.client.bot_id() {
            return Ok(DispatchOutcome::NoCommand);
        }

        let guild_profile = match message.guild_id() {
            Some(guild_id) => Some(self.store.guild_profile(guild_id).await?),
            None => None,
        };
        let prefix = guild_profile
            .as_ref()
            .and_then(|g| g.prefix.as_deref())
            .filter(|p| !p.is_empty())
            .unwrap_or(self.config.bot.prefix.as_str())
            .to_owned();

        let Some((trigger, args)) = parse_command(&message.content, &prefix) else {
            return Ok(DispatchOutcome::NoCommand);
        };
        if self.handler.resolve(&trigger).is_none() {
            return Ok(DispatchOutcome::NoCommand);
        }

        let user_profile = self.store.user_profile(&message.author.id).await?;
        let guild = match message.guild_id() {
            Some(guild_id) => self.lookup.guild(guild_id).await,
            None => None,
        };
        self.lookup.cache_user(message.author.clone());

        let mut invocation = Invocation::new(
            Arc::clone(&self.client),
            message,
            prefix,
            trigger,
            args,
        )
        .with_user_profile(user_profile);
        if let Some(profile) = guild_profile {
            invocation = invocation.with_guild_profile(profile);
        }
        if let Some(guild) = guild {
            invocation = invocation.with_guild(guild);
        }

        let trigger = invocation.trigger().to_owned();
        let user = invocation.author_id().to_owned();
        let outcome = self.handler.dispatch(Arc::new(invocation)).await?;

        match &outcome {
            DispatchOutcome::Executed => info!(%trigger, %user, "Command executed"),
            other => debug!(%trigger, %user, outcome = ?other, "Command not executed"),
        }
        Ok(outcome)
    }

    /// Handles messages from `messages` until Ctrl+C (or SIGTERM on unix),
    /// then waits for in-flight dispatches to finish.
    pub async fn run<S>(self: Arc<Self>, messages: S) -> RuntimeResult<()>
    where
        S: Stream<Item = IncomingMessage> + Send,
    {
        self.run_until(messages, wait_for_shutdown()).await
    }

    /// Like [`run`](Self::run) with a custom shutdown future. Also returns
    /// when the stream ends.
    pub async fn run_until<S, F>(self: Arc<Self>, messages: S, shutdown: F) -> RuntimeResult<()>
    where
        S: Stream<Item = IncomingMessage> + Send,
        F: Future<Output = ()>,
    {
        let mut messages = pin!(messages);
        let mut shutdown = pin!(shutdown);

        info!(
            prefix = %self.config.bot.prefix,
            categories = self.handler.category_names().len(),
            "Herald runtime is running"
        );

        loop {
            tokio::select! {
                message = messages.next() => {
                    let Some(message) = message else {
                        debug!("Message stream ended");
                        break;
                    };
                    let span = span!(
                        Level::DEBUG,
                        "message",
                        id = %message.id,
                        channel = %message.channel.id
                    );
                    let runtime = Arc::clone(&self);
                    self.tracker.spawn(
                        async move {
                            if let Err(e) = runtime.handle_message(message).await {
                                error!(error = %e, "Failed to handle message");
                            }
                        }
                        .instrument(span),
                    );
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
        self.typing.stop_all();

        info!("Herald runtime stopped");
        Ok(())
    }
}

impl std::fmt::Debug for HeraldRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeraldRuntime")
            .field("config", &self.config)
            .field("handler", &self.handler)
            .field("lookup", &self.lookup)
            .field("typing", &self.typing)
            .finish_non_exhaustive()
    }
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for [`HeraldRuntime`].
pub struct RuntimeBuilder {
    client: BoxedClient,
    config: Option<HeraldConfig>,
    config_file: Option<PathBuf>,
    profile: Option<String>,
    store: Option<BoxedStore>,
    loader: Option<Arc<dyn CategoryLoader>>,
    restrictions: Option<RestrictionSet>,
    init_logging: bool,
}

impl RuntimeBuilder {
    pub fn new(client: BoxedClient) -> Self {
        Self {
            client,
            config: None,
            config_file: None,
            profile: None,
            store: None,
            loader: None,
            restrictions: None,
            init_logging: false,
        }
    }

    /// Uses this configuration instead of loading one.
    pub fn config(mut self, config: HeraldConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Profile store. Defaults to a [`StaticConfigStore`] serving
    /// `defaults.user` and `defaults.guild` from the configuration.
    pub fn store(mut self, store: BoxedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn loader(mut self, loader: Arc<dyn CategoryLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Replaces the restriction predicates built from `bot` settings.
    pub fn restrictions(mut self, restrictions: RestrictionSet) -> Self {
        self.restrictions = Some(restrictions);
        self
    }

    /// Installs the global tracing subscriber from `logging` settings.
    pub fn init_logging(mut self, enabled: bool) -> Self {
        self.init_logging = enabled;
        self
    }

    pub fn build(self) -> RuntimeResult<HeraldRuntime> {
        let config = match self.config {
            Some(config) => config,
            None => {
                let mut loader = ConfigLoader::new();
                if let Some(profile) = &self.profile {
                    loader = loader.profile(profile);
                }
                if let Some(path) = &self.config_file {
                    loader = loader.file(path);
                }
                loader.load()?
            }
        };
        validate_config(&config)?;

        if self.init_logging && !logging::init_from_config(&config.logging) {
            warn!("A global tracing subscriber is already installed");
        }

        let store = self.store.unwrap_or_else(|| {
            Arc::new(StaticConfigStore::new(
                config.defaults.user.clone(),
                config.defaults.guild.clone(),
            ))
        });

        let mut handler = CommandHandler::builder()
            .restrictions(
                self.restrictions
                    .unwrap_or_else(|| RestrictionSet::new(config.bot.restriction_settings())),
            )
            .anti_spam(config.anti_spam.to_anti_spam_config());
        if let Some(loader) = self.loader {
            handler = handler.shared_loader(loader);
        }

        info!(
            prefix = %config.bot.prefix,
            beta = config.bot.beta,
            anti_spam_hits = config.anti_spam.max_hits,
            "Runtime initialized from configuration"
        );

        Ok(HeraldRuntime {
            lookup: Lookup::new(Arc::clone(&self.client)),
            typing: TypingIndicator::new(Arc::clone(&self.client)),
            handler: Arc::new(handler.build()),
            client: self.client,
            store,
            config,
            tracker: TaskTracker::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use crate::testing::StubClient;
    use futures::stream;
    use herald_core::{Channel, GuildProfile, User, UserProfile};
    use herald_framework::{Category, Command};

    fn message(author: &str, channel: Channel, content: &str) -> IncomingMessage {
        IncomingMessage {
            id: "m".into(),
            channel,
            author: User::new(author, author),
            content: content.into(),
        }
    }

    fn runtime_with(client: &StubClient, store: Option<StaticConfigStore>) -> HeraldRuntime {
        let mut builder = HeraldRuntime::builder(Arc::new(client.clone())).config(HeraldConfig::default());
        if let Some(store) = store {
            builder = builder.store(Arc::new(store));
        }
        let runtime = builder.build().unwrap();
        runtime
            .handler()
            .add_category(
                Category::new("util", "util.rs")
                    .command(Command::new(["ping"]).unwrap().executor(|inv, _| async move {
                        inv.reply("pong").await?;
                        Ok(())
                    }))
                    .command(Command::new(["perk"]).unwrap().executor(|inv, _| async move {
                        let text = if inv.user_profile().donator { "thanks" } else { "none" };
                        inv.reply(text).await?;
                        Ok(())
                    })),
            )
            .unwrap();
        runtime
    }

    #[tokio::test]
    async fn test_handle_message_executes() {
        let client = StubClient::new();
        let runtime = runtime_with(&client, None);

        let outcome = runtime
            .handle_message(message("u", Channel::direct("c"), "!PING"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Executed);
        assert_eq!(client.sent_texts(), ["pong"]);
    }

    #[tokio::test]
    async fn test_ignores_bots_and_plain_text() {
        let client = StubClient::new();
        let runtime = runtime_with(&client, None);

        let mut from_bot = message("other-bot", Channel::direct("c"), "!ping");
        from_bot.author.bot = true;
        let ignored = [
            from_bot,
            message("bot", Channel::direct("c"), "!ping"),
            message("u", Channel::direct("c"), "ping"),
            message("u", Channel::direct("c"), "!nope"),
        ];
        for msg in ignored {
            assert_eq!(runtime.handle_message(msg).await.unwrap(), DispatchOutcome::NoCommand);
        }
        assert!(client.sent_texts().is_empty());
    }

    #[tokio::test]
    async fn test_guild_prefix_and_profiles() {
        let client = StubClient::new();
        let store = StaticConfigStore::default();
        store.set_guild(
            "g",
            GuildProfile {
                prefix: Some("?".into()),
                ..Default::default()
            },
        );
        store.set_user(
            "fan",
            UserProfile {
                donator: true,
                ..Default::default()
            },
        );
        let runtime = runtime_with(&client, Some(store));
        let channel = Channel::in_guild("c", "g");

        let outcome = runtime
            .handle_message(message("u", channel.clone(), "!ping"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::NoCommand);

        runtime.handle_message(message("u", channel.clone(), "?perk")).await.unwrap();
        runtime.handle_message(message("fan", channel, "?perk")).await.unwrap();
        assert_eq!(client.sent_texts(), ["none", "thanks"]);
        assert_eq!(client.guild_fetches(), 2);
    }

    #[tokio::test]
    async fn test_run_until_stream_ends() {
        let client = StubClient::new();
        let runtime = Arc::new(runtime_with(&client, None));

        let messages = stream::iter(vec![
            message("a", Channel::direct("c1"), "!ping"),
            message("b", Channel::direct("c2"), "!ping"),
            message("c", Channel::direct("c3"), "hello"),
        ]);
        Arc::clone(&runtime)
            .run_until(messages, std::future::pending())
            .await
            .unwrap();

        assert_eq!(client.sent_texts(), ["pong", "pong"]);
    }

    #[tokio::test]
    async fn test_build_rejects_invalid_config() {
        let mut config = HeraldConfig::default();
        config.bot.prefix = "a b".into();
        let err = HeraldRuntime::builder(Arc::new(StubClient::new()))
            .config(config)
            .build()
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
    }
}
