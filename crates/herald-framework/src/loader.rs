//! Category loading for hot reload.
//!
//! [`CommandHandler::reload_category`](crate::handler::CommandHandler::reload_category)
//! does not know how categories are produced. It asks a [`CategoryLoader`]
//! to forget whatever it cached for a source and then to load the source
//! again. [`ModuleLoader`] is the bundled implementation: a table of
//! factory functions keyed by [`SourceRef`], with a cache of built
//! categories in front of it.
//!
//! ```text
//! reload("fun") ─▶ remove ─▶ invalidate(commands/fun/mod.rs) ─▶ load ─▶ add
//!                            └─ drops every cached commands/fun/* entry
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::category::{Category, SourceRef};
use crate::error::LoadError;

/// Produces categories from sources.
pub trait CategoryLoader: Send + Sync + 'static {
    /// Forgets cached state for `source` and everything that lives next to it.
    fn invalidate(&self, source: &SourceRef);

    /// Loads the category declared at `source`.
    fn load(&self, source: &SourceRef) -> Result<Category, LoadError>;
}

/// Builds a fresh category.
pub type CategoryFactory = Arc<dyn Fn() -> Result<Category, LoadError> + Send + Sync>;

/// A [`CategoryLoader`] backed by registered factory functions.
///
/// # Example
///
/// ```rust,ignore
/// let loader = ModuleLoader::new()
///     .with("commands/fun/mod.rs", || Ok(fun::category()))
///     .with("commands/admin/mod.rs", || Ok(admin::category()));
/// let handler = CommandHandler::builder().loader(loader).build();
/// handler.load_category("commands/fun/mod.rs")?;
/// ```
#[derive(Default)]
pub struct ModuleLoader {
    factories: RwLock<HashMap<SourceRef, CategoryFactory>>,
    cache: Mutex<HashMap<SourceRef, Category>>,
}

impl ModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory (builder pattern).
    pub fn with<F>(self, source: impl Into<SourceRef>, factory: F) -> Self
    where
        F: Fn() -> Result<Category, LoadError> + Send + Sync + 'static,
    {
        self.register(source, factory);
        self
    }

    /// Registers or replaces a factory. A replaced factory only takes effect
    /// once the cached category for its source is invalidated.
    pub fn register<F>(&self, source: impl Into<SourceRef>, factory: F)
    where
        F: Fn() -> Result<Category, LoadError> + Send + Sync + 'static,
    {
        self.factories.write().insert(source.into(), Arc::new(factory));
    }

    /// Returns `true` if a built category is cached for `source`.
    pub fn is_cached(&self, source: &SourceRef) -> bool {
        self.cache.lock().contains_key(source)
    }
}

impl CategoryLoader for ModuleLoader {
    fn invalidate(&self, source: &SourceRef) {
        let dir = source.parent();
        let mut cache = self.cache.lock();
        let before = cache.len();
        cache.retain(|cached, _| cached != source && cached.parent() != dir);
        debug!(
            source = %source,
            dropped = before - cache.len(),
            "Invalidated cached categories"
        );
    }

    fn load(&self, source: &SourceRef) -> Result<Category, LoadError> {
        if let Some(cached) = self.cache.lock().get(source) {
            return Ok(cached.clone());
        }

        let factory = self
            .factories
            .read()
            .get(source)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(source.clone()))?;
        let category = factory()?;
        debug!(source = %source, category = category.name(), "Built category");

        self.cache.lock().insert(source.clone(), category.clone());
        Ok(category)
    }
}
