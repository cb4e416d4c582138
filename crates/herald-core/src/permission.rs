//! Channel-level permissions.
//!
//! [`Permission`] names a single capability; [`PermissionSet`] is the
//! effective set a user (or the bot itself) holds in one channel, as reported
//! by [`ChatClient`](crate::client::ChatClient).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single channel permission.
///
/// Serialized in camelCase, matching the names most gateway payloads use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    CreateInstantInvite,
    KickMembers,
    BanMembers,
    /// Implies every other permission.
    Administrator,
    ManageChannels,
    ManageGuild,
    AddReactions,
    ViewAuditLog,
    ViewChannel,
    SendMessages,
    ManageMessages,
    EmbedLinks,
    AttachFiles,
    ReadMessageHistory,
    MentionEveryone,
    UseExternalEmojis,
    Connect,
    Speak,
    ManageNicknames,
    ManageRoles,
    ManageWebhooks,
}

impl Permission {
    /// Returns the wire name of this permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateInstantInvite => "createInstantInvite",
            Self::KickMembers => "kickMembers",
            Self::BanMembers => "banMembers",
            Self::Administrator => "administrator",
            Self::ManageChannels => "manageChannels",
            Self::ManageGuild => "manageGuild",
            Self::AddReactions => "addReactions",
            Self::ViewAuditLog => "viewAuditLog",
            Self::ViewChannel => "viewChannel",
            Self::SendMessages => "sendMessages",
            Self::ManageMessages => "manageMessages",
            Self::EmbedLinks => "embedLinks",
            Self::AttachFiles => "attachFiles",
            Self::ReadMessageHistory => "readMessageHistory",
            Self::MentionEveryone => "mentionEveryone",
            Self::UseExternalEmojis => "useExternalEmojis",
            Self::Connect => "connect",
            Self::Speak => "speak",
            Self::ManageNicknames => "manageNicknames",
            Self::ManageRoles => "manageRoles",
            Self::ManageWebhooks => "manageWebhooks",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The effective permissions held in a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Creates a set holding [`Permission::Administrator`].
    pub fn administrator() -> Self {
        Self::from_iter([Permission::Administrator])
    }

    /// Adds a permission.
    pub fn insert(&mut self, permission: Permission) {
        self.0.insert(permission);
    }

    /// Returns `true` if `permission` is granted, directly or through
    /// [`Permission::Administrator`].
    pub fn has(&self, permission: Permission) -> bool {
        self.0.contains(&Permission::Administrator) || self.0.contains(&permission)
    }

    /// Returns the permissions from `required` that are not granted, in the
    /// order they were requested.
    pub fn missing(&self, required: &[Permission]) -> Vec<Permission> {
        required.iter().copied().filter(|p| !self.has(*p)).collect()
    }

    /// Iterates the explicitly held permissions.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
