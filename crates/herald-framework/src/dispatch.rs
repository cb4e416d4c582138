//! The dispatch pipeline.
//!
//! ```text
//!            ┌──────────────┐
//! invocation │ resolve      │── unknown trigger ─────────────▶ NoCommand
//!            │ -h / --help  │── Help hook ───────────────────▶ HelpShown
//!            │ bot perms    │── PermissionError hook ────────▶ PermissionDenied
//!            │ user perms   │── PermissionError hook ────────▶ PermissionDenied
//!            │ restrictions │── Restriction(r) hook ─────────▶ Restricted
//!            │ anti-spam    │── flagged ─────────────────────▶ Suppressed
//!            │ cooldown     │── Cooldown hook ───────────────▶ CooldownActive
//!            │ executor     │── InvalidUsage hook ───────────▶ InvalidUsage
//!            └──────────────┘                                 ▶ Executed
//! ```
//!
//! Anti-spam is recorded before the cooldown is looked at, so a user
//! flooding a command on cooldown stops receiving notices. The cooldown is
//! then checked and started in one step.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, Level, debug, span, warn};

use crate::command::Command;
use crate::cooldown::CooldownState;
use crate::error::{CommandError, DispatchError};
use crate::handler::CommandHandler;
use crate::invocation::Invocation;
use crate::overrides::{HookArgs, HookOutcome, PermissionScope};
use crate::responses;
use crate::restriction::Restriction;

/// How a dispatch ended.
///
/// `overridden` is `true` when the command's hook handled the situation and
/// `false` when the built-in response was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No command matches the trigger.
    NoCommand,
    /// The executor ran to completion.
    Executed,
    /// Help was shown instead of running the command.
    HelpShown,
    PermissionDenied {
        scope: PermissionScope,
        overridden: bool,
    },
    Restricted {
        restriction: Restriction,
        overridden: bool,
    },
    CooldownActive {
        remaining: Duration,
        overridden: bool,
    },
    /// Anti-spam flagged the invocation. Nothing was sent.
    Suppressed,
    /// The executor reported a usage error.
    InvalidUsage { overridden: bool },
}

impl DispatchOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }
}

impl CommandHandler {
    /// Runs the full pipeline for one invocation.
    pub async fn dispatch(
        &self,
        invocation: Arc<Invocation>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            trigger = %invocation.trigger(),
            user = %invocation.author_id()
        );
        let outcome = self.run_pipeline(invocation).instrument(span.clone()).await;
        let _enter = span.enter();
        match &outcome {
            Ok(outcome) => debug!(?outcome, "Dispatch finished"),
            Err(e) => debug!(error = %e, "Dispatch failed"),
        }
        outcome
    }

    async fn run_pipeline(
        &self,
        invocation: Arc<Invocation>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(command) = self.resolve(invocation.trigger()) else {
            return Ok(DispatchOutcome::NoCommand);
        };

        if invocation.wants_help() {
            run_hook(&command, &invocation, HookArgs::Help, || {
                responses::help(&command, invocation.prefix())
            })
            .await?;
            return Ok(DispatchOutcome::HelpShown);
        }

        if let Some(denied) = self.check_permissions(&command, &invocation).await? {
            return Ok(denied);
        }

        if let Some(restriction) = self.restrictions().first_failure(&invocation, &command) {
            let overridden = run_hook(
                &command,
                &invocation,
                HookArgs::Restriction(restriction),
                || responses::restricted(restriction),
            )
            .await?;
            return Ok(DispatchOutcome::Restricted {
                restriction,
                overridden,
            });
        }

        if command.executor_fn().is_none() {
            return Err(DispatchError::MissingExecutor(command.key().to_owned()));
        }

        // Flagged invocations register no cooldown, so anti-spam is recorded
        // first. A hit made while on cooldown still counts.
        let user_id = invocation.author_id();
        if !self.anti_spam().check(user_id, &command).allowed {
            return Ok(DispatchOutcome::Suppressed);
        }

        let duration = command.effective_cooldown(invocation.user_profile().donator);
        let cooldown = if duration.is_zero() {
            CooldownState::INACTIVE
        } else {
            self.cooldowns().check_or_start(user_id, &command, duration)
        };

        if cooldown.active {
            let remaining = cooldown.remaining;
            let overridden = run_hook(
                &command,
                &invocation,
                HookArgs::Cooldown { remaining },
                || responses::cooldown(&command, remaining),
            )
            .await?;
            return Ok(DispatchOutcome::CooldownActive {
                remaining,
                overridden,
            });
        }

        match command.run(Arc::clone(&invocation)).await {
            None => Err(DispatchError::MissingExecutor(command.key().to_owned())),
            Some(Ok(())) => Ok(DispatchOutcome::Executed),
            Some(Err(CommandError::InvalidUsage(usage))) => {
                let text = responses::invalid_usage(&command, invocation.prefix(), &usage);
                let overridden =
                    run_hook(&command, &invocation, HookArgs::InvalidUsage(usage), || text)
                        .await?;
                Ok(DispatchOutcome::InvalidUsage { overridden })
            }
            Some(Err(source)) => Err(DispatchError::Command {
                trigger: command.key().to_owned(),
                source,
            }),
        }
    }

    /// Checks bot and then user permissions. Developers skip the user check.
    async fn check_permissions(
        &self,
        command: &Arc<Command>,
        invocation: &Arc<Invocation>,
    ) -> Result<Option<DispatchOutcome>, DispatchError> {
        let required = command.required_permissions();
        let client = invocation.client();
        let channel_id = invocation.channel_id();

        if !required.bot.is_empty() || !required.bot_useful.is_empty() {
            let held = client.bot_permissions(channel_id).await?;

            let missing_useful = held.missing(&required.bot_useful);
            if !missing_useful.is_empty() {
                warn!(
                    command = command.key(),
                    channel = channel_id,
                    missing = ?missing_useful,
                    "Bot is missing useful permissions"
                );
            }

            let missing = held.missing(&required.bot);
            if !missing.is_empty() {
                let text = responses::permission_denied(PermissionScope::Bot, &missing);
                let args = HookArgs::Permission {
                    scope: PermissionScope::Bot,
                    missing,
                };
                let overridden = run_hook(command, invocation, args, || text).await?;
                return Ok(Some(DispatchOutcome::PermissionDenied {
                    scope: PermissionScope::Bot,
                    overridden,
                }));
            }
        }

        let user_id = invocation.author_id();
        if required.user.is_empty() || self.restrictions().settings().is_developer(user_id) {
            return Ok(None);
        }

        let held = client.user_permissions(channel_id, user_id).await?;
        let missing = held.missing(&required.user);
        if missing.is_empty() {
            return Ok(None);
        }
        let text = responses::permission_denied(PermissionScope::User, &missing);
        let args = HookArgs::Permission {
            scope: PermissionScope::User,
            missing,
        };
        let overridden = run_hook(command, invocation, args, || text).await?;
        Ok(Some(DispatchOutcome::PermissionDenied {
            scope: PermissionScope::User,
            overridden,
        }))
    }
}

/// Runs a hook and falls back to `default_text` when it returns
/// [`HookOutcome::Default`]. Returns whether the hook handled it.
async fn run_hook(
    command: &Arc<Command>,
    invocation: &Arc<Invocation>,
    args: HookArgs,
    default_text: impl FnOnce() -> String,
) -> Result<bool, DispatchError> {
    let outcome = command
        .run_override(Arc::clone(invocation), args)
        .await
        .map_err(|source| DispatchError::Command {
            trigger: command.key().to_owned(),
            source,
        })?;

    match outcome {
        HookOutcome::Handled => Ok(true),
        HookOutcome::Default => {
            invocation.reply(&default_text()).await?;
            Ok(false)
        }
    }
}
