//! Command descriptors.
//!
//! A [`Command`] is built once, wrapped in an [`Arc`] by its [`Category`]
//! and shared read-only from then on. All behaviour a command contributes to
//! dispatch lives here: its triggers, permission requirements, restrictions,
//! cooldowns, executor and override hooks.
//!
//! [`Category`]: crate::category::Category

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use herald_core::Permission;

use crate::category::SourceRef;
use crate::error::{CommandError, HandlerError, HandlerResult};
use crate::invocation::Invocation;
use crate::overrides::{HookArgs, HookContext, HookId, HookOutcome, Overrides};
use crate::restriction::Restriction;

pub use futures::future::BoxFuture;

/// A type-erased command executor.
pub type Executor = Arc<
    dyn Fn(Arc<Invocation>, Arc<Command>) -> BoxFuture<'static, Result<(), CommandError>>
        + Send
        + Sync,
>;

/// Permission requirements of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPermissions {
    /// Permissions the bot must hold for the command to run.
    pub bot: Vec<Permission>,
    /// Permissions the bot should hold. Missing ones are only logged.
    pub bot_useful: Vec<Permission>,
    /// Permissions the invoking user must hold.
    pub user: Vec<Permission>,
}

/// A chat command.
///
/// # Example
///
/// ```rust,ignore
/// let ban = Command::new(["ban", "b"])?
///     .description("Bans a member")
///     .usage("<user> [reason]")
///     .permissions(vec![Permission::BanMembers], vec![], vec![Permission::BanMembers])
///     .cooldown(Duration::from_secs(5), true)
///     .executor(|inv, _cmd| async move {
///         let target = inv.args().first().ok_or(UsageError::missing_argument("user"))?;
///         inv.reply(&format!("banned {target}")).await?;
///         Ok(())
///     });
/// ```
#[derive(Clone)]
pub struct Command {
    triggers: Vec<String>,
    permissions: CommandPermissions,
    restrictions: Vec<Restriction>,
    usage: String,
    description: String,
    cooldown: Duration,
    donator_cooldown: Duration,
    category: Option<String>,
    executor: Option<Executor>,
    overrides: Overrides,
    has_slash_variant: bool,
    source: Option<SourceRef>,
}

impl Command {
    /// Creates a command with the given triggers.
    ///
    /// Triggers are lowercased. Fails with [`HandlerError::InvalidArgument`]
    /// if the list is empty or a trigger is blank or contains whitespace.
    pub fn new<I, S>(triggers: I) -> HandlerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            triggers: normalize_triggers(triggers)?,
            permissions: CommandPermissions::default(),
            restrictions: Vec::new(),
            usage: String::new(),
            description: String::new(),
            cooldown: Duration::ZERO,
            donator_cooldown: Duration::ZERO,
            category: None,
            executor: None,
            overrides: Overrides::new(),
            has_slash_variant: false,
            source: None,
        })
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Replaces the trigger list.
    pub fn triggers<I, S>(mut self, triggers: I) -> HandlerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers = normalize_triggers(triggers)?;
        Ok(self)
    }

    /// Sets the hard and advisory bot permissions.
    pub fn bot_permissions(mut self, required: Vec<Permission>, useful: Vec<Permission>) -> Self {
        self.permissions.bot = required;
        self.permissions.bot_useful = useful;
        self
    }

    pub fn user_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.permissions.user = permissions;
        self
    }

    /// Sets all three permission lists at once.
    pub fn permissions(
        self,
        bot: Vec<Permission>,
        bot_useful: Vec<Permission>,
        user: Vec<Permission>,
    ) -> Self {
        self.bot_permissions(bot, bot_useful).user_permissions(user)
    }

    /// Sets the restrictions, evaluated in the given order.
    pub fn restrictions(mut self, restrictions: Vec<Restriction>) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the cooldown. With `donator_same` the donator cooldown follows.
    pub fn cooldown(mut self, cooldown: Duration, donator_same: bool) -> Self {
        self.cooldown = cooldown;
        if donator_same {
            self.donator_cooldown = cooldown;
        }
        self
    }

    pub fn donator_cooldown(mut self, cooldown: Duration) -> Self {
        self.donator_cooldown = cooldown;
        self
    }

    /// Sets the owning category name. Called by [`Category::command`](crate::category::Category::command).
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    /// Sets the executor.
    pub fn executor<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Invocation>, Arc<Command>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        self.executor = Some(Arc::new(move |inv, cmd| f(inv, cmd).boxed()));
        self
    }

    /// Installs an override hook.
    pub fn set_override<F, Fut>(mut self, hook: impl Into<HookId>, f: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HookOutcome, CommandError>> + Send + 'static,
    {
        self.overrides.set(hook.into(), f);
        self
    }

    pub fn has_slash_variant(mut self, value: bool) -> Self {
        self.has_slash_variant = value;
        self
    }

    /// Sets the file this command was declared in.
    pub fn source(mut self, source: impl Into<SourceRef>) -> Self {
        self.source = Some(source.into());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The command's identity: its first trigger.
    pub fn key(&self) -> &str {
        self.triggers.first().map_or("", String::as_str)
    }

    pub fn trigger_list(&self) -> &[String] {
        &self.triggers
    }

    /// Returns `true` if `trigger` (any case) names this command.
    pub fn matches(&self, trigger: &str) -> bool {
        let trigger = trigger.to_lowercase();
        self.triggers.iter().any(|t| *t == trigger)
    }

    /// Returns the first trigger shared with `other`, if any.
    pub fn overlap<'a>(&'a self, other: &Command) -> Option<&'a str> {
        self.triggers
            .iter()
            .find(|t| other.triggers.contains(t))
            .map(String::as_str)
    }

    pub fn required_permissions(&self) -> &CommandPermissions {
        &self.permissions
    }

    pub fn restriction_list(&self) -> &[Restriction] {
        &self.restrictions
    }

    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub fn cooldown_duration(&self) -> Duration {
        self.cooldown
    }

    pub fn donator_cooldown_duration(&self) -> Duration {
        self.donator_cooldown
    }

    /// The cooldown that applies to a user with the given donator status.
    pub fn effective_cooldown(&self, donator: bool) -> Duration {
        if donator {
            self.donator_cooldown
        } else {
            self.cooldown
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Localization key: `commands.<category>.<first trigger>`.
    pub fn lang_key(&self) -> String {
        format!(
            "commands.{}.{}",
            self.category.as_deref().unwrap_or_default(),
            self.key()
        )
    }

    pub fn source_ref(&self) -> Option<&SourceRef> {
        self.source.as_ref()
    }

    pub fn slash_variant(&self) -> bool {
        self.has_slash_variant
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn executor_fn(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Runs the executor. `None` when the command has none.
    pub async fn run(
        self: &Arc<Self>,
        invocation: Arc<Invocation>,
    ) -> Option<Result<(), CommandError>> {
        let executor = self.executor.clone()?;
        Some(executor(invocation, Arc::clone(self)).await)
    }

    /// Runs the override hook selected by `args`, forwarding its result.
    pub async fn run_override(
        self: &Arc<Self>,
        invocation: Arc<Invocation>,
        args: HookArgs,
    ) -> Result<HookOutcome, CommandError> {
        let ctx = HookContext {
            invocation,
            command: Arc::clone(self),
            args,
        };
        self.overrides.run(ctx).await
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("triggers", &self.triggers)
            .field("category", &self.category)
            .field("permissions", &self.permissions)
            .field("restrictions", &self.restrictions)
            .field("cooldown", &self.cooldown)
            .field("donator_cooldown", &self.donator_cooldown)
            .field("has_executor", &self.executor.is_some())
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

fn normalize_triggers<I, S>(triggers: I) -> HandlerResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let triggers: Vec<String> = triggers
        .into_iter()
        .map(|t| t.into().to_lowercase())
        .collect();
    if triggers.is_empty() {
        return Err(HandlerError::invalid_argument("a command needs at least one trigger"));
    }
    if let Some(bad) = triggers
        .iter()
        .find(|t| t.is_empty() || t.chars().any(char::is_whitespace))
    {
        return Err(HandlerError::invalid_argument(format!(
            "invalid trigger {bad:?}"
        )));
    }
    Ok(triggers)
}
