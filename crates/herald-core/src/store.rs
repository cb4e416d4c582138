//! Read-only configuration storage.
//!
//! Per-user and per-guild settings are owned by the host's database. The
//! dispatch core reads them once per invocation (donator status, premium
//! status, custom prefix) and never writes back.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreResult;

/// Per-user settings relevant to dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Donators get the command's donator cooldown and pass `donator`
    /// restrictions.
    #[serde(default)]
    pub donator: bool,
    /// Host-specific fields the core does not interpret.
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

/// Per-guild settings relevant to dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildProfile {
    /// Guild-specific command prefix. Falls back to the global prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub premium: bool,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

/// Read-only access to stored per-user and per-guild configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync + 'static {
    /// Returns the profile for a user, or the defaults if none is stored.
    async fn user_profile(&self, user_id: &str) -> StoreResult<UserProfile>;

    /// Returns the profile for a guild, or the defaults if none is stored.
    async fn guild_profile(&self, guild_id: &str) -> StoreResult<GuildProfile>;
}

/// A shared store trait object.
pub type BoxedStore = Arc<dyn ConfigStore>;

/// An in-memory store that serves configured defaults plus optional
/// per-id entries.
///
/// Useful for tests and for hosts without a database.
#[derive(Debug, Default)]
pub struct StaticConfigStore {
    user_default: UserProfile,
    guild_default: GuildProfile,
    users: RwLock<HashMap<String, UserProfile>>,
    guilds: RwLock<HashMap<String, GuildProfile>>,
}

impl StaticConfigStore {
    /// Creates a store returning the given defaults.
    pub fn new(user_default: UserProfile, guild_default: GuildProfile) -> Self {
        Self {
            user_default,
            guild_default,
            users: RwLock::new(HashMap::new()),
            guilds: RwLock::new(HashMap::new()),
        }
    }

    /// Stores a profile for a specific user.
    pub fn set_user(&self, user_id: impl Into<String>, profile: UserProfile) {
        self.users.write().insert(user_id.into(), profile);
    }

    /// Stores a profile for a specific guild.
    pub fn set_guild(&self, guild_id: impl Into<String>, profile: GuildProfile) {
        self.guilds.write().insert(guild_id.into(), profile);
    }
}

#[async_trait]
impl ConfigStore for StaticConfigStore {
    async fn user_profile(&self, user_id: &str) -> StoreResult<UserProfile> {
        Ok(self
            .users
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| self.user_default.clone()))
    }

    async fn guild_profile(&self, guild_id: &str) -> StoreResult<GuildProfile> {
        Ok(self
            .guilds
            .read()
            .get(guild_id)
            .cloned()
            .unwrap_or_else(|| self.guild_default.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_store_falls_back_to_defaults() {
        let store = StaticConfigStore::new(
            UserProfile::default(),
            GuildProfile {
                prefix: Some("?".into()),
                ..Default::default()
            },
        );
        store.set_user(
            "7",
            UserProfile {
                donator: true,
                ..Default::default()
            },
        );

        assert!(store.user_profile("7").await.unwrap().donator);
        assert!(!store.user_profile("8").await.unwrap().donator);
        assert_eq!(
            store.guild_profile("1").await.unwrap().prefix.as_deref(),
            Some("?")
        );
    }

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"donator":true,"locale":"en"}"#).unwrap();
        assert!(profile.donator);
        assert_eq!(profile.extra.get("locale"), Some(&Value::from("en")));
    }
}
