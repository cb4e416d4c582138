//! The command registry.
//!
//! [`CommandHandler`] owns every registered [`Category`] together with the
//! rate gates and restriction predicates used during dispatch. Registry
//! operations are synchronous and atomic: each takes the registry lock once
//! and either applies completely or not at all.
//!
//! Derived views ([`commands`](CommandHandler::commands),
//! [`triggers`](CommandHandler::triggers),
//! [`category_names`](CommandHandler::category_names)) are recomputed from
//! the category list on every call, so they can never drift from it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::antispam::{AntiSpam, AntiSpamConfig};
use crate::category::{Category, SourceRef};
use crate::command::Command;
use crate::cooldown::CooldownHandler;
use crate::error::{HandlerError, HandlerResult};
use crate::loader::{CategoryLoader, ModuleLoader};
use crate::restriction::RestrictionSet;

/// Identifies a category by name or by the registered instance itself.
#[derive(Debug, Clone)]
pub enum CategoryRef {
    Name(String),
    Category(Arc<Category>),
}

impl From<&str> for CategoryRef {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for CategoryRef {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<Arc<Category>> for CategoryRef {
    fn from(value: Arc<Category>) -> Self {
        Self::Category(value)
    }
}

impl From<&Arc<Category>> for CategoryRef {
    fn from(value: &Arc<Category>) -> Self {
        Self::Category(Arc::clone(value))
    }
}

/// Identifies a command by a trigger or by another command whose triggers
/// overlap it.
#[derive(Debug, Clone)]
pub enum CommandRef {
    Trigger(String),
    Command(Arc<Command>),
}

impl From<&str> for CommandRef {
    fn from(value: &str) -> Self {
        Self::Trigger(value.to_owned())
    }
}

impl From<String> for CommandRef {
    fn from(value: String) -> Self {
        Self::Trigger(value)
    }
}

impl From<Arc<Command>> for CommandRef {
    fn from(value: Arc<Command>) -> Self {
        Self::Command(value)
    }
}

impl From<&Arc<Command>> for CommandRef {
    fn from(value: &Arc<Command>) -> Self {
        Self::Command(Arc::clone(value))
    }
}

/// Builder for [`CommandHandler`].
#[derive(Default)]
pub struct CommandHandlerBuilder {
    restrictions: Option<RestrictionSet>,
    anti_spam: Option<AntiSpamConfig>,
    loader: Option<Arc<dyn CategoryLoader>>,
}

impl CommandHandlerBuilder {
    pub fn restrictions(mut self, restrictions: RestrictionSet) -> Self {
        self.restrictions = Some(restrictions);
        self
    }

    pub fn anti_spam(mut self, config: AntiSpamConfig) -> Self {
        self.anti_spam = Some(config);
        self
    }

    /// Sets the loader used by [`CommandHandler::reload_category`].
    pub fn loader(mut self, loader: impl CategoryLoader) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Sets a loader shared with the caller.
    pub fn shared_loader(mut self, loader: Arc<dyn CategoryLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn build(self) -> CommandHandler {
        CommandHandler {
            categories: RwLock::new(Vec::new()),
            cooldowns: CooldownHandler::new(),
            anti_spam: AntiSpam::new(self.anti_spam.unwrap_or_default()),
            restrictions: self.restrictions.unwrap_or_default(),
            loader: self
                .loader
                .unwrap_or_else(|| Arc::new(ModuleLoader::new())),
        }
    }
}

/// Owns the registry and runs the dispatch pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let handler = CommandHandler::builder()
///     .restrictions(RestrictionSet::new(settings))
///     .loader(loader)
///     .build();
/// handler.add_category(fun::category())?;
///
/// let outcome = handler.dispatch(Arc::new(invocation)).await?;
/// ```
pub struct CommandHandler {
    categories: RwLock<Vec<Arc<Category>>>,
    cooldowns: CooldownHandler,
    anti_spam: AntiSpam,
    restrictions: RestrictionSet,
    loader: Arc<dyn CategoryLoader>,
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CommandHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CommandHandlerBuilder {
        CommandHandlerBuilder::default()
    }

    // =========================================================================
    // Registry operations
    // =========================================================================

    /// Registers a category and all of its commands.
    ///
    /// Fails without touching the registry if the name is taken or any
    /// trigger collides, either with a registered command or with another
    /// command of the same category.
    pub fn add_category(&self, category: impl Into<Arc<Category>>) -> HandlerResult<()> {
        let category = category.into();
        if category.name().is_empty() {
            return Err(HandlerError::invalid_argument("category name must not be empty"));
        }

        let mut categories = self.categories.write();

        if let Some(existing) = categories.iter().find(|c| c.name() == category.name()) {
            return Err(HandlerError::DuplicateCategory {
                name: category.name().to_owned(),
                incoming: category.source().clone(),
                existing: existing.source().clone(),
            });
        }

        let mut taken: HashMap<&str, &SourceRef> = HashMap::new();
        for registered in categories.iter() {
            for command in registered.command_list() {
                let source = command.source_ref().unwrap_or(registered.source());
                for trigger in command.trigger_list() {
                    taken.insert(trigger, source);
                }
            }
        }
        for command in category.command_list() {
            let source = command.source_ref().unwrap_or(category.source());
            for trigger in command.trigger_list() {
                if let Some(existing) = taken.insert(trigger, source) {
                    return Err(HandlerError::DuplicateCommand {
                        trigger: trigger.clone(),
                        incoming: source.clone(),
                        existing: existing.clone(),
                    });
                }
            }
        }
        drop(taken);

        info!(
            category = category.name(),
            commands = category.len(),
            source = %category.source(),
            "Registered category"
        );
        categories.push(category);
        Ok(())
    }

    /// Unregisters a category and all of its commands.
    ///
    /// A [`CategoryRef::Category`] only matches the exact registered
    /// instance. Returns `Ok(false)` when nothing matched.
    pub fn remove_category(&self, category: impl Into<CategoryRef>) -> HandlerResult<bool> {
        let category = category.into();
        if let CategoryRef::Name(name) = &category
            && name.is_empty()
        {
            return Err(HandlerError::invalid_argument("category name must not be empty"));
        }

        let mut categories = self.categories.write();
        let position = match &category {
            CategoryRef::Name(name) => categories.iter().position(|c| c.name() == name),
            CategoryRef::Category(target) => categories.iter().position(|c| Arc::ptr_eq(c, target)),
        };
        let Some(position) = position else {
            return Ok(false);
        };

        let removed = categories.remove(position);
        info!(
            category = removed.name(),
            commands = removed.len(),
            "Removed category"
        );
        Ok(true)
    }

    /// Looks up a registered category by name.
    pub fn get_category(&self, name: &str) -> HandlerResult<Option<Arc<Category>>> {
        if name.is_empty() {
            return Err(HandlerError::invalid_argument("category name must not be empty"));
        }
        Ok(self
            .categories
            .read()
            .iter()
            .find(|c| c.name() == name)
            .cloned())
    }

    /// Resolves a command and the category it belongs to.
    pub fn get_command(
        &self,
        command: impl Into<CommandRef>,
    ) -> HandlerResult<Option<(Arc<Command>, Arc<Category>)>> {
        let command = command.into();
        let trigger = match &command {
            CommandRef::Trigger(trigger) if trigger.is_empty() => {
                return Err(HandlerError::invalid_argument("trigger must not be empty"));
            }
            CommandRef::Trigger(trigger) => Some(trigger.to_lowercase()),
            CommandRef::Command(_) => None,
        };

        let categories = self.categories.read();
        for category in categories.iter() {
            for registered in category.command_list() {
                let hit = match (&trigger, &command) {
                    (Some(trigger), _) => registered.trigger_list().contains(trigger),
                    (None, CommandRef::Command(other)) => registered.overlap(other).is_some(),
                    (None, CommandRef::Trigger(_)) => false,
                };
                if hit {
                    return Ok(Some((Arc::clone(registered), Arc::clone(category))));
                }
            }
        }
        Ok(None)
    }

    /// Replaces a category with a freshly loaded copy of its source.
    ///
    /// Runs remove, invalidate, load and add in sequence. If loading or
    /// re-adding fails the category stays unregistered and the error is
    /// returned.
    pub fn reload_category(&self, category: impl Into<CategoryRef>) -> HandlerResult<()> {
        let current = match category.into() {
            CategoryRef::Name(name) => self
                .get_category(&name)?
                .ok_or(HandlerError::CategoryNotFound(name))?,
            CategoryRef::Category(category) => category,
        };

        if !self.remove_category(&current)? {
            return Err(HandlerError::CategoryNotFound(current.name().to_owned()));
        }

        let source = current.source();
        self.loader.invalidate(source);
        let fresh = self.loader.load(source)?;
        self.add_category(fresh)?;

        info!(category = current.name(), source = %source, "Reloaded category");
        Ok(())
    }

    /// Loads a category through the configured loader and registers it.
    pub fn load_category(&self, source: impl Into<SourceRef>) -> HandlerResult<Arc<Category>> {
        let category = Arc::new(self.loader.load(&source.into())?);
        self.add_category(Arc::clone(&category))?;
        Ok(category)
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Every registered command, in registration order.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.categories
            .read()
            .iter()
            .flat_map(|c| c.command_list().iter().cloned())
            .collect()
    }

    /// Every registered trigger, aliases included.
    pub fn triggers(&self) -> Vec<String> {
        self.categories
            .read()
            .iter()
            .flat_map(|c| c.command_list())
            .flat_map(|cmd| cmd.trigger_list().iter().cloned())
            .collect()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .read()
            .iter()
            .map(|c| c.name().to_owned())
            .collect()
    }

    pub fn categories(&self) -> Vec<Arc<Category>> {
        self.categories.read().clone()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn cooldowns(&self) -> &CooldownHandler {
        &self.cooldowns
    }

    pub fn anti_spam(&self) -> &AntiSpam {
        &self.anti_spam
    }

    pub fn restrictions(&self) -> &RestrictionSet {
        &self.restrictions
    }

    pub fn loader(&self) -> &Arc<dyn CategoryLoader> {
        &self.loader
    }

    /// Resolves a trigger (case-insensitively) to its command.
    pub fn resolve(&self, trigger: &str) -> Option<Arc<Command>> {
        if trigger.is_empty() {
            return None;
        }
        let trigger = trigger.to_lowercase();
        self.categories
            .read()
            .iter()
            .flat_map(|c| c.command_list())
            .find(|cmd| cmd.trigger_list().contains(&trigger))
            .cloned()
    }
}

impl fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHandler")
            .field("categories", &self.category_names())
            .field("cooldowns", &self.cooldowns.len())
            .field("restrictions", &self.restrictions)
            .finish_non_exhaustive()
    }
}
