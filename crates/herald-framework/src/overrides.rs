//! Per-command override hooks.
//!
//! Every failure class of the dispatch pipeline has a customization point.
//! The set of points is closed: one per [`Restriction`] plus
//! `PermissionError`, `InvalidUsage`, `Help` and `Cooldown`. Hooks are stored
//! in a fixed-size table indexed by [`HookId`], and every slot shares the same
//! signature:
//!
//! ```text
//! Fn(HookContext) -> BoxFuture<'static, Result<HookOutcome, CommandError>>
//! ```
//!
//! A hook that returns [`HookOutcome::Default`] asks the handler to apply its
//! built-in response. [`HookOutcome::Handled`] means the hook already
//! responded. Empty slots behave like a hook that always returns `Default`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use herald_core::Permission;

use crate::command::{BoxFuture, Command};
use crate::error::{CommandError, UsageError};
use crate::invocation::Invocation;
use crate::restriction::Restriction;

/// Number of hook slots: four lifecycle hooks plus one per restriction.
pub const HOOK_COUNT: usize = 4 + Restriction::ALL.len();

/// Which side of a permission check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionScope {
    /// The bot lacks a permission.
    Bot,
    /// The invoking user lacks a permission.
    User,
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bot => "bot",
            Self::User => "user",
        })
    }
}

/// Identifies a hook slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookId {
    PermissionError,
    InvalidUsage,
    Help,
    Cooldown,
    Restriction(Restriction),
}

impl HookId {
    /// Slot index in the hook table.
    pub const fn index(self) -> usize {
        match self {
            Self::PermissionError => 0,
            Self::InvalidUsage => 1,
            Self::Help => 2,
            Self::Cooldown => 3,
            Self::Restriction(r) => 4 + r.index(),
        }
    }
}

impl From<Restriction> for HookId {
    fn from(value: Restriction) -> Self {
        Self::Restriction(value)
    }
}

/// Hook-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum HookArgs {
    /// Permissions missing for the given side.
    Permission {
        scope: PermissionScope,
        missing: Vec<Permission>,
    },
    /// The executor reported a usage error.
    InvalidUsage(UsageError),
    /// The user asked for the command's help.
    Help,
    /// The command is on cooldown for this user.
    Cooldown { remaining: Duration },
    /// A restriction failed.
    Restriction(Restriction),
}

impl HookArgs {
    /// The slot these arguments belong to.
    pub fn hook_id(&self) -> HookId {
        match self {
            Self::Permission { .. } => HookId::PermissionError,
            Self::InvalidUsage(_) => HookId::InvalidUsage,
            Self::Help => HookId::Help,
            Self::Cooldown { .. } => HookId::Cooldown,
            Self::Restriction(r) => HookId::Restriction(*r),
        }
    }
}

/// Everything a hook receives.
#[derive(Clone)]
pub struct HookContext {
    pub invocation: Arc<Invocation>,
    pub command: Arc<Command>,
    pub args: HookArgs,
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("command", &self.command.key())
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// What a hook did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// Use the handler's built-in behaviour.
    Default,
    /// The hook handled the situation itself.
    Handled,
}

impl HookOutcome {
    pub fn is_default(self) -> bool {
        self == Self::Default
    }
}

/// A type-erased override hook.
pub type OverrideFn =
    Arc<dyn Fn(HookContext) -> BoxFuture<'static, Result<HookOutcome, CommandError>> + Send + Sync>;

/// The fixed hook table of a command.
#[derive(Clone, Default)]
pub struct Overrides {
    slots: [Option<OverrideFn>; HOOK_COUNT],
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a hook, replacing any previous one in the same slot.
    pub fn set<F, Fut>(&mut self, hook: HookId, f: F)
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HookOutcome, CommandError>> + Send + 'static,
    {
        self.slots[hook.index()] = Some(Arc::new(move |ctx| f(ctx).boxed()));
    }

    /// Removes a hook, restoring the default behaviour for that slot.
    pub fn clear(&mut self, hook: HookId) {
        self.slots[hook.index()] = None;
    }

    /// Returns `true` if a custom hook is installed in the slot.
    pub fn is_set(&self, hook: HookId) -> bool {
        self.slots[hook.index()].is_some()
    }

    /// Runs the hook matching `ctx.args`, forwarding its result unchanged.
    pub async fn run(&self, ctx: HookContext) -> Result<HookOutcome, CommandError> {
        match &self.slots[ctx.args.hook_id().index()] {
            Some(hook) => hook(ctx).await,
            None => Ok(HookOutcome::Default),
        }
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
            .collect();
        f.debug_struct("Overrides")
            .field("installed", &installed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClient, invocation_in};
    use herald_core::Channel;

    fn ctx(args: HookArgs) -> HookContext {
        let client = MockClient::new();
        HookContext {
            invocation: Arc::new(invocation_in(&client, Channel::direct("c"), "u", "x")),
            command: Arc::new(Command::new(["x"]).unwrap()),
            args,
        }
    }

    #[test]
    fn test_hook_indices_are_distinct() {
        let mut ids = vec![
            HookId::PermissionError,
            HookId::InvalidUsage,
            HookId::Help,
            HookId::Cooldown,
        ];
        ids.extend(Restriction::ALL.map(HookId::Restriction));
        let mut indices: Vec<usize> = ids.iter().map(|h| h.index()).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), HOOK_COUNT);
        assert_eq!(indices.last().copied(), Some(HOOK_COUNT - 1));
    }

    #[tokio::test]
    async fn test_empty_slot_returns_default() {
        let overrides = Overrides::new();
        let outcome = overrides.run(ctx(HookArgs::Help)).await.unwrap();
        assert_eq!(outcome, HookOutcome::Default);
    }

    #[tokio::test]
    async fn test_hook_result_is_forwarded_unchanged() {
        let mut overrides = Overrides::new();
        overrides.set(HookId::Cooldown, |_| async { Ok(HookOutcome::Handled) });
        overrides.set(HookId::Restriction(Restriction::Nsfw), |_| async {
            Err(CommandError::failed("boom"))
        });

        let outcome = overrides
            .run(ctx(HookArgs::Cooldown {
                remaining: Duration::from_secs(3),
            }))
            .await;
        assert!(matches!(outcome, Ok(HookOutcome::Handled)));

        let outcome = overrides
            .run(ctx(HookArgs::Restriction(Restriction::Nsfw)))
            .await;
        assert!(matches!(outcome, Err(CommandError::Failed(ref m)) if m == "boom"));

        // Other restriction slots are untouched.
        let outcome = overrides
            .run(ctx(HookArgs::Restriction(Restriction::Beta)))
            .await;
        assert!(matches!(outcome, Ok(HookOutcome::Default)));
    }
}
