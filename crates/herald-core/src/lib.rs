//! # Herald Core
//!
//! Platform-facing foundation of the Herald command framework.
//!
//! The dispatch core never talks to a chat platform or a database directly.
//! Everything it needs from the outside world goes through two narrow traits
//! defined here:
//!
//! - [`ChatClient`]: permission queries, user/guild lookups, typing
//!   indicators and message sending.
//! - [`ConfigStore`]: read-only per-user and per-guild configuration.
//!
//! ```text
//! ┌──────────────┐      ┌────────────────┐      ┌─────────────┐
//! │ Chat platform│◀────▶│   ChatClient   │◀────▶│             │
//! └──────────────┘      └────────────────┘      │  Dispatch   │
//! ┌──────────────┐      ┌────────────────┐      │    core     │
//! │   Database   │─────▶│  ConfigStore   │─────▶│             │
//! └──────────────┘      └────────────────┘      └─────────────┘
//! ```
//!
//! The remaining modules hold the plain data types exchanged across those
//! traits: [`Permission`], [`User`], [`Guild`], [`Channel`] and
//! [`IncomingMessage`].

pub mod client;
pub mod error;
pub mod model;
pub mod permission;
pub mod store;

pub use client::{BoxedClient, ChatClient};
pub use error::{ApiError, ApiResult, StoreError, StoreResult};
pub use model::{Channel, Guild, IncomingMessage, User};
pub use permission::{Permission, PermissionSet};
pub use store::{BoxedStore, ConfigStore, GuildProfile, StaticConfigStore, UserProfile};

/// Prelude for common imports.
pub mod prelude {
    pub use super::client::{BoxedClient, ChatClient};
    pub use super::error::{ApiError, ApiResult, StoreError, StoreResult};
    pub use super::model::{Channel, Guild, IncomingMessage, User};
    pub use super::permission::{Permission, PermissionSet};
    pub use super::store::{ConfigStore, GuildProfile, UserProfile};
}
