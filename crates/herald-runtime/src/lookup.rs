//! Cached user and guild lookups.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;
use tracing::{trace, warn};

use herald_core::{BoxedClient, Guild, User};

/// Users kept by [`Lookup::new`] before the oldest is evicted.
pub const DEFAULT_USER_CAPACITY: usize = 10_000;

/// Insertion-ordered user cache with a fixed capacity.
#[derive(Default)]
struct UserCache {
    entries: HashMap<String, User>,
    order: VecDeque<String>,
    capacity: usize,
}

impl UserCache {
    fn insert(&mut self, user: User) {
        if self.capacity == 0 {
            return;
        }
        if !self.entries.contains_key(&user.id) {
            while self.entries.len() >= self.capacity {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
            }
            self.order.push_back(user.id.clone());
        }
        self.entries.insert(user.id.clone(), user);
    }

    fn remove(&mut self, user_id: &str) -> bool {
        if self.entries.remove(user_id).is_none() {
            return false;
        }
        self.order.retain(|id| id != user_id);
        true
    }
}

/// Lookups that consult a local cache before asking the platform.
///
/// Fetched users are remembered, up to a capacity after which the oldest
/// entry is evicted. Fetched guilds are not, since guild data changes often
/// enough that a stale copy would mislead restriction checks. Platform
/// errors are logged and reported as a miss.
pub struct Lookup {
    client: BoxedClient,
    users: RwLock<UserCache>,
    guilds: RwLock<HashMap<String, Guild>>,
}

impl Lookup {
    pub fn new(client: BoxedClient) -> Self {
        Self::with_user_capacity(client, DEFAULT_USER_CAPACITY)
    }

    /// A lookup caching at most `capacity` users. `0` disables the cache.
    pub fn with_user_capacity(client: BoxedClient, capacity: usize) -> Self {
        Self {
            client,
            users: RwLock::new(UserCache {
                capacity,
                ..Default::default()
            }),
            guilds: RwLock::new(HashMap::new()),
        }
    }

    pub async fn user(&self, user_id: &str) -> Option<User> {
        if let Some(user) = self.users.read().entries.get(user_id) {
            return Some(user.clone());
        }

        match self.client.fetch_user(user_id).await {
            Ok(Some(user)) => {
                trace!(user = %user_id, "Caching fetched user");
                self.users.write().insert(user.clone());
                Some(user)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(user = %user_id, error = %e, "User lookup failed");
                None
            }
        }
    }

    pub async fn guild(&self, guild_id: &str) -> Option<Guild> {
        if let Some(guild) = self.guilds.read().get(guild_id) {
            return Some(guild.clone());
        }

        match self.client.fetch_guild(guild_id).await {
            Ok(guild) => guild,
            Err(e) => {
                warn!(guild = %guild_id, error = %e, "Guild lookup failed");
                None
            }
        }
    }

    /// Seeds the user cache, e.g. from a message author.
    pub fn cache_user(&self, user: User) {
        self.users.write().insert(user);
    }

    /// Seeds the guild cache from a gateway event.
    pub fn cache_guild(&self, guild: Guild) {
        self.guilds.write().insert(guild.id.clone(), guild);
    }

    /// Drops a cached user. Returns whether one was cached.
    pub fn forget_user(&self, user_id: &str) -> bool {
        self.users.write().remove(user_id)
    }

    pub fn forget_guild(&self, guild_id: &str) -> bool {
        self.guilds.write().remove(guild_id).is_some()
    }

    pub fn cached_users(&self) -> usize {
        self.users.read().entries.len()
    }
}

impl std::fmt::Debug for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookup")
            .field("cached_users", &self.users.read().entries.len())
            .field("cached_guilds", &self.guilds.read().len())
            .finish()
    }
}
