//! Named preconditions gating command execution.
//!
//! Each [`Restriction`] tag maps to one predicate slot in a
//! [`RestrictionSet`]. A command lists the tags it needs; the handler
//! evaluates them in declaration order and stops at the first failure,
//! running that restriction's own override hook.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::invocation::Invocation;

/// A restriction tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Restriction {
    /// Only available while the bot runs in beta mode.
    Beta,
    /// Only available to developers.
    Developer,
    /// Only available to donators.
    Donator,
    /// Only available to the owner of the guild.
    GuildOwner,
    /// Only available in NSFW channels.
    Nsfw,
    /// Only available in premium guilds.
    Premium,
    /// Only available in the support server.
    SupportServer,
}

impl Restriction {
    /// Every restriction, in slot order.
    pub const ALL: [Restriction; 7] = [
        Self::Beta,
        Self::Developer,
        Self::Donator,
        Self::GuildOwner,
        Self::Nsfw,
        Self::Premium,
        Self::SupportServer,
    ];

    /// Slot index of this restriction in fixed-size tables.
    pub const fn index(self) -> usize {
        match self {
            Self::Beta => 0,
            Self::Developer => 1,
            Self::Donator => 2,
            Self::GuildOwner => 3,
            Self::Nsfw => 4,
            Self::Premium => 5,
            Self::SupportServer => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beta => "beta",
            Self::Developer => "developer",
            Self::Donator => "donator",
            Self::GuildOwner => "guildOwner",
            Self::Nsfw => "nsfw",
            Self::Premium => "premium",
            Self::SupportServer => "supportServer",
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A restriction predicate. Returns `true` when the invocation may proceed.
pub type RestrictionFn = Arc<dyn Fn(&Invocation, &Command) -> bool + Send + Sync>;

/// Bot-wide settings the default predicates read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionSettings {
    /// Whether this bot instance is a beta build.
    #[serde(default)]
    pub beta: bool,
    /// User ids with developer access.
    #[serde(default)]
    pub developers: Vec<String>,
    /// Guild id of the support server.
    #[serde(default)]
    pub support_server_id: Option<String>,
}

impl RestrictionSettings {
    pub fn is_developer(&self, user_id: &str) -> bool {
        self.developers.iter().any(|d| d == user_id)
    }
}

/// A fixed table of restriction predicates, one per [`Restriction`].
///
/// # Example
///
/// ```rust,ignore
/// let restrictions = RestrictionSet::new(settings)
///     // Treat every guild as premium during the launch week.
///     .with(Restriction::Premium, |_, _| true);
/// ```
#[derive(Clone)]
pub struct RestrictionSet {
    settings: Arc<RestrictionSettings>,
    predicates: [RestrictionFn; 7],
}

impl Default for RestrictionSet {
    fn default() -> Self {
        Self::new(RestrictionSettings::default())
    }
}

impl RestrictionSet {
    /// Creates a set with the default predicates for every restriction.
    pub fn new(settings: RestrictionSettings) -> Self {
        let settings = Arc::new(settings);
        let predicates = Restriction::ALL.map(|r| default_predicate(r, Arc::clone(&settings)));
        Self {
            settings,
            predicates,
        }
    }

    /// Replaces the predicate for one restriction (builder pattern).
    pub fn with<F>(mut self, restriction: Restriction, predicate: F) -> Self
    where
        F: Fn(&Invocation, &Command) -> bool + Send + Sync + 'static,
    {
        self.predicates[restriction.index()] = Arc::new(predicate);
        self
    }

    pub fn settings(&self) -> &RestrictionSettings {
        &self.settings
    }

    /// Evaluates a single restriction.
    pub fn check(&self, restriction: Restriction, invocation: &Invocation, command: &Command) -> bool {
        (self.predicates[restriction.index()])(invocation, command)
    }

    /// Evaluates the command's restrictions in declaration order and returns
    /// the first one that fails.
    pub fn first_failure(&self, invocation: &Invocation, command: &Command) -> Option<Restriction> {
        command
            .restriction_list()
            .iter()
            .copied()
            .find(|r| !self.check(*r, invocation, command))
    }
}

impl fmt::Debug for RestrictionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestrictionSet")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn default_predicate(restriction: Restriction, settings: Arc<RestrictionSettings>) -> RestrictionFn {
    match restriction {
        Restriction::Beta => Arc::new(move |inv: &Invocation, _: &Command| {
            settings.beta || settings.is_developer(inv.author_id())
        }),
        Restriction::Developer => {
            Arc::new(move |inv: &Invocation, _: &Command| settings.is_developer(inv.author_id()))
        }
        Restriction::Donator => Arc::new(move |inv: &Invocation, _: &Command| {
            inv.user_profile().donator || settings.is_developer(inv.author_id())
        }),
        Restriction::GuildOwner => Arc::new(move |inv: &Invocation, _: &Command| {
            inv.guild().is_some_and(|g| g.owner_id == inv.author_id())
                || settings.is_developer(inv.author_id())
        }),
        Restriction::Nsfw => Arc::new(|inv: &Invocation, _: &Command| inv.channel().nsfw),
        Restriction::Premium => Arc::new(move |inv: &Invocation, _: &Command| {
            inv.guild_profile().is_some_and(|g| g.premium) || settings.is_developer(inv.author_id())
        }),
        Restriction::SupportServer => Arc::new(move |inv: &Invocation, _: &Command| {
            match (&settings.support_server_id, inv.guild_id()) {
                (Some(support), Some(guild)) => support == guild,
                _ => false,
            }
        }),
    }
}
